use crate::data::PreferenceRow;
use rand::Rng;
use rand::rngs::StdRng;

// one past the highest meaningful rank on the 1-4 preference scale
const RANK_CEILING: f64 = 5.0;

/// Satisfaction value for one (course, slot) pair.
///
/// An unranked slot scores exactly 0: a course never earns credit for a
/// slot it did not request. Otherwise the base reward for a strong (low)
/// rank is discounted by the slot's popularity, so demand spreads away
/// from crowded slots, plus a small positive noise term that breaks ties
/// between otherwise-equal assignments. The noise comes from the caller's
/// generator, so a pinned seed reproduces the value exactly.
pub fn satisfaction(rank: u32, popularity: f64, rng: &mut StdRng) -> f64 {
    if rank == 0 {
        return 0.0;
    }
    let noise = rng.gen_range(1..=10) as f64 / 10.0;
    let value = (RANK_CEILING - f64::from(rank)) - popularity + noise;
    value.max(0.0)
}

/// Builds the `[slot][course]` satisfaction matrix in a fixed walk order.
pub fn build_matrix(
    rows: &[PreferenceRow],
    popularity: &[f64],
    rng: &mut StdRng,
) -> Vec<Vec<f64>> {
    (0..popularity.len())
        .map(|s| {
            rows.iter()
                .map(|row| satisfaction(row.ranks[s], popularity[s], rng))
                .collect()
        })
        .collect()
}
