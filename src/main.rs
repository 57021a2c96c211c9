use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Populate a grid from a RON config and print the placement report
    Generate {
        /// Generator config file (see demos/)
        #[arg(long)]
        config: PathBuf,
        /// Override the config's seed policy with a fixed seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a scripted actor walk through a teleport-chest network
    Simulate {
        #[arg(long, default_value_t = 3)]
        chests: usize,
        /// Simulated seconds
        #[arg(long, default_value_t = 30.0)]
        duration: f32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Generate { config, seed } => mcvillage::app::run_generate(&config, seed),
        Command::Simulate {
            chests,
            duration,
            seed,
        } => mcvillage::app::run_simulate(chests, duration, seed),
    }
}
