//! Weighted random selection
//!
//! Cumulative-walk pick over a candidate weight list. Selection is a pure
//! function of (weights, roll), so a fixed roll always selects the same
//! candidate regardless of how the roll was produced.

/// Pick an index from `weights` given a uniform roll in [0, 1)
///
/// The roll is scaled by the total mass and walked against the running
/// cumulative sum; the first candidate whose cumulative weight reaches it
/// wins (inclusive boundary). Weights at or below zero contribute no mass
/// but remain addressable: with zero total mass the first candidate is
/// selected.
///
/// Panics in debug builds if `weights` is empty; callers filter candidates
/// first.
pub fn pick_weighted(weights: &[f32], roll: f32) -> usize {
    debug_assert!(!weights.is_empty());

    let total: f32 = weights.iter().map(|w| w.max(0.0)).sum();
    let target = roll * total;

    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight.max(0.0);
        if target <= cumulative {
            return index;
        }
    }
    // Float slop on the final cumulative sum
    weights.len() - 1
}
