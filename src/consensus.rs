use crate::data::PreferenceRow;
use good_lp::{
    Expression, ProblemVariables, Solution, SolverModel, Variable, constraint, default_solver,
    variable,
};
use itertools::Itertools;
use log::{info, trace};
use std::collections::HashMap;

/// Result of aggregating per-course preference rankings over the slots.
pub struct ConsensusOutcome {
    /// Per-slot popularity in [0, 1], indexed like the catalog.
    /// 1 = most popular; uniform 0.5 when no signal exists.
    pub popularity: Vec<f64>,
    /// Minimized total pairwise disagreement (the Kemeny distance).
    /// `None` when no consensus order was certified and the mean-rank
    /// fallback supplied the popularity instead.
    pub score: Option<f64>,
}

// midpoint of the 1-4 preference scale, used for never-ranked candidates
// in the fallback path
const FALLBACK_MIDPOINT: f64 = 2.5;

/// Aggregates the preference table into a single popularity score per slot.
///
/// Rows with no non-zero rank are degenerate voters and are dropped before
/// aggregation. With no usable voters the outcome is a neutral uniform 0.5
/// popularity and a zero disagreement score, never an error.
pub fn slot_popularity(
    rows: &[PreferenceRow],
    n_slots: usize,
    time_limit_secs: Option<f64>,
) -> ConsensusOutcome {
    let voters: Vec<&PreferenceRow> = rows
        .iter()
        .filter(|row| row.ranks.iter().any(|&r| r > 0))
        .collect();

    if voters.is_empty() || n_slots == 0 {
        trace!("No usable voters in the preference table; popularity is uniform");
        return ConsensusOutcome {
            popularity: vec![0.5; n_slots],
            score: Some(0.0),
        };
    }

    kemeny_rank(&voters, n_slots, time_limit_secs)
}

/// Exact Kemeny-Young consensus over the slots, as an integer program.
///
/// One binary precedence variable per ordered candidate pair, totality on
/// every unordered pair, and 3-cycle elimination over ordered triples. The
/// triple constraints grow cubically in the candidate count, which is fine
/// for a catalog of order tens and no further.
fn kemeny_rank(
    voters: &[&PreferenceRow],
    n_slots: usize,
    time_limit_secs: Option<f64>,
) -> ConsensusOutcome {
    let mut problem = ProblemVariables::new();

    // precedes[(i, j)] = 1 iff slot i is ahead of slot j in the consensus order
    let mut precedes: HashMap<(usize, usize), Variable> = HashMap::new();
    for (i, j) in (0..n_slots).tuple_combinations() {
        precedes.insert((i, j), problem.add(variable().binary()));
        precedes.insert((j, i), problem.add(variable().binary()));
    }

    // each disagreement term is the reverse of one voter's stated order on
    // one pair the voter ranked both sides of
    let mut disagreements: Vec<Variable> = Vec::new();
    for voter in voters {
        for (i, j) in (0..n_slots).tuple_combinations() {
            let (ri, rj) = (voter.ranks[i], voter.ranks[j]);
            if ri == 0 || rj == 0 || ri == rj {
                continue;
            }
            let reversed = if ri < rj { (j, i) } else { (i, j) };
            disagreements.push(precedes[&reversed]);
        }
    }

    if disagreements.is_empty() {
        // no voter distinguishes any pair of slots
        return ConsensusOutcome {
            popularity: vec![0.5; n_slots],
            score: Some(0.0),
        };
    }

    let objective: Expression = disagreements.iter().copied().sum();
    // microlp backend has no solver options (threads/seed/logging/time limit)
    let _ = time_limit_secs;
    let mut model = problem.minimise(objective).using(default_solver);

    // exactly one direction per pair
    for (i, j) in (0..n_slots).tuple_combinations() {
        let forward = precedes[&(i, j)];
        let backward = precedes[&(j, i)];
        model.add_constraint(constraint!(forward + backward == 1));
    }

    // forbid 3-cycles, forcing a linear order
    for i in 0..n_slots {
        for j in 0..n_slots {
            for k in 0..n_slots {
                if i == j || j == k || i == k {
                    continue;
                }
                let ij = precedes[&(i, j)];
                let jk = precedes[&(j, k)];
                let ki = precedes[&(k, i)];
                model.add_constraint(constraint!(ij + jk + ki <= 2));
            }
        }
    }

    info!(
        "Solving Kemeny-Young consensus over {} candidates and {} voters...",
        n_slots,
        voters.len()
    );
    match model.solve() {
        Ok(solution) => {
            // loss count: how many rivals precede each candidate
            let losses: Vec<f64> = (0..n_slots)
                .map(|j| {
                    (0..n_slots)
                        .filter(|&i| i != j && solution.value(precedes[&(i, j)]) > 0.5)
                        .count() as f64
                })
                .collect();
            let score: f64 = disagreements.iter().map(|v| solution.value(*v)).sum();
            trace!("Consensus loss counts: {:?}", losses);
            ConsensusOutcome {
                popularity: rescale(&losses),
                score: Some(score),
            }
        }
        Err(e) => {
            info!("Consensus solve not certified optimal ({e}); using mean-rank fallback");
            ConsensusOutcome {
                popularity: rescale(&approximate_ranks(voters, n_slots)),
                score: None,
            }
        }
    }
}

/// Approximate popularity signal: the mean of each candidate's non-zero
/// ranks across voters, with never-ranked candidates at the scale midpoint.
fn approximate_ranks(voters: &[&PreferenceRow], n_slots: usize) -> Vec<f64> {
    (0..n_slots)
        .map(|j| {
            let ranked: Vec<f64> = voters
                .iter()
                .map(|voter| voter.ranks[j])
                .filter(|&r| r > 0)
                .map(f64::from)
                .collect();
            if ranked.is_empty() {
                FALLBACK_MIDPOINT
            } else {
                ranked.iter().sum::<f64>() / ranked.len() as f64
            }
        })
        .collect()
}

/// Linearly rescales rank-like values (lower = better) to [0, 1] popularity
/// with the best candidate at 1. A full tie collapses to uniform 0.5.
fn rescale(raw: &[f64]) -> Vec<f64> {
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    if max == min {
        return vec![0.5; raw.len()];
    }
    raw.iter().map(|&v| (max - v) / (max - min)).collect()
}
