use crate::catalog::{DayPattern, START_TIMES, SlotCatalog};
use crate::consensus;
use crate::data::{OptimizeRequest, ScheduleEntry, ScheduleResult};
use crate::error::ScheduleError;
use crate::satisfaction;
use crate::stats;
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, constraint,
    default_solver, variable,
};
use log::{info, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;

/// Runs the full optimization pipeline: consensus ranking, satisfaction
/// scoring, then the assignment ILP. A pure function of the request; no
/// state survives the call.
pub fn optimize(request: &OptimizeRequest) -> Result<ScheduleResult, ScheduleError> {
    let catalog = SlotCatalog::standard();
    validate(request, &catalog)?;

    let consensus = consensus::slot_popularity(
        &request.preferences,
        catalog.len(),
        request.config.time_limit_secs,
    );
    let slot_popularity: BTreeMap<String, f64> = catalog
        .slots()
        .iter()
        .zip(&consensus.popularity)
        .map(|(slot, &p)| (slot.code.to_string(), p))
        .collect();

    let n_courses = request.preferences.len();
    if n_courses == 0 {
        info!("No courses supplied; returning an empty schedule without solving");
        return Ok(ScheduleResult {
            entries: Vec::new(),
            satisfaction_total: 0.0,
            consensus_score: consensus.score,
            slot_popularity,
            solve_time_ms: 0,
            stats: stats::summarize(&[], &catalog),
        });
    }

    let mut rng = match request.config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let matrix = satisfaction::build_matrix(&request.preferences, &consensus.popularity, &mut rng);

    let voting_courses = voting_course_indices(request);
    trace!(
        "{} of {} courses are taught by voting faculty",
        voting_courses.len(),
        n_courses
    );

    let start_time = Instant::now();
    let assigned = solve_assignment(
        &matrix,
        &voting_courses,
        &catalog,
        request.config.time_limit_secs,
    )?;
    let solve_time_ms = start_time.elapsed().as_millis();
    info!("Assignment solved in {solve_time_ms} ms");

    let mut entries = Vec::with_capacity(n_courses);
    let mut satisfaction_total = 0.0;
    for (course_idx, &slot_idx) in assigned.iter().enumerate() {
        let slot = catalog.slot(slot_idx);
        let value = matrix[slot_idx][course_idx];
        satisfaction_total += value;
        entries.push(ScheduleEntry {
            course: request.preferences[course_idx].course.clone(),
            slot: slot.code.to_string(),
            time: slot.label.to_string(),
            satisfaction: value,
        });
    }

    Ok(ScheduleResult {
        entries,
        satisfaction_total,
        consensus_score: consensus.score,
        slot_popularity,
        solve_time_ms,
        stats: stats::summarize(&assigned, &catalog),
    })
}

fn validate(request: &OptimizeRequest, catalog: &SlotCatalog) -> Result<(), ScheduleError> {
    for row in &request.preferences {
        if row.ranks.len() != catalog.len() {
            return Err(ScheduleError::MalformedInput(format!(
                "course {} supplied {} ranks, expected {}",
                row.course,
                row.ranks.len(),
                catalog.len()
            )));
        }
    }
    Ok(())
}

/// Indices (into the preference table) of courses taught by voting faculty.
/// Courses with no roster mapping simply contribute nothing.
fn voting_course_indices(request: &OptimizeRequest) -> Vec<usize> {
    let voting_faculty: HashSet<&str> = request
        .faculty
        .iter()
        .filter(|f| f.voting)
        .map(|f| f.name.as_str())
        .collect();
    let faculty_for: HashMap<&str, &str> = request
        .courses
        .iter()
        .map(|c| (c.course.as_str(), c.faculty.as_str()))
        .collect();

    request
        .preferences
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            faculty_for
                .get(row.course.as_str())
                .is_some_and(|f| voting_faculty.contains(f))
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Builds and solves the course-to-slot ILP, returning one slot index per
/// course. Anything short of certified optimality returns an error and no
/// partial schedule.
fn solve_assignment(
    matrix: &[Vec<f64>],
    voting_courses: &[usize],
    catalog: &SlotCatalog,
    time_limit_secs: Option<f64>,
) -> Result<Vec<usize>, ScheduleError> {
    let n_slots = catalog.len();
    let n_courses = matrix[0].len();
    info!("Setting up assignment ILP with {n_courses} courses and {n_slots} slots...");

    let mut problem = ProblemVariables::new();

    // x[i][j] = 1 if course j meets in slot i
    let x: Vec<Vec<Variable>> = (0..n_slots)
        .map(|_| problem.add_vector(variable().binary(), n_courses))
        .collect();

    let objective: Expression = x
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(move |(j, &var)| matrix[i][j] * var)
        })
        .sum();

    let pattern_floor = (n_courses as f64 / 2.0).ceil() - 1.0;
    let time_floor = (n_courses / START_TIMES.len()) as f64;
    let time_cap = time_floor + 2.0;
    trace!(
        "Balance bounds: pattern floor {pattern_floor}, start-time band [{time_floor}, {time_cap}]"
    );

    // microlp backend has no solver options (threads/seed/logging/time limit)
    let _ = time_limit_secs;
    let mut model = problem.maximise(objective).using(default_solver);

    // each course meets exactly once
    for j in 0..n_courses {
        let assigned: Expression = (0..n_slots).map(|i| x[i][j]).sum();
        model.add_constraint(constraint!(assigned == 1));
    }

    // near-even floor for each day pattern
    for pattern in [DayPattern::Mwf, DayPattern::Tt] {
        let total: Expression = catalog
            .pattern_indices(pattern)
            .into_iter()
            .flat_map(|i| x[i].iter().copied())
            .sum();
        model.add_constraint(constraint!(total >= pattern_floor));
    }

    // keep every start time inside its band
    for start in START_TIMES {
        let total: Expression = catalog
            .start_time_indices(start)
            .into_iter()
            .flat_map(|i| x[i].iter().copied())
            .sum();
        model.add_constraint(constraint!(total.clone() >= time_floor));
        model.add_constraint(constraint!(total <= time_cap));
    }

    // hold the reserved meeting slot clear of voting faculty, but only
    // when voting faculty actually have courses in the pool
    if !voting_courses.is_empty() {
        let reserved: Expression = voting_courses
            .iter()
            .map(|&j| x[catalog.exclusion_slot()][j])
            .sum();
        model.add_constraint(constraint!(reserved == 0));
    }

    info!("Starting assignment solve...");
    let solution = model.solve().map_err(|e| match e {
        ResolutionError::Infeasible | ResolutionError::Unbounded | ResolutionError::Other(_) => {
            ScheduleError::Unsolved(e.to_string())
        }
        other => ScheduleError::SolverFault(other.to_string()),
    })?;

    let mut assigned = vec![usize::MAX; n_courses];
    for (i, row) in x.iter().enumerate() {
        for (j, &var) in row.iter().enumerate() {
            if solution.value(var) > 0.9 {
                assigned[j] = i;
            }
        }
    }
    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CourseListing, FacultyMember, OptimizeConfig, PreferenceRow};

    /// Ten-course request; the listed course indices are taught by voting
    /// faculty and `ranks_for` supplies each course's preference row.
    fn request(voting: &[usize], ranks_for: impl Fn(usize) -> Vec<u32>) -> OptimizeRequest {
        let n = 10;
        OptimizeRequest {
            faculty: (0..n)
                .map(|j| FacultyMember {
                    name: format!("f{j}"),
                    adjustment: 0.0,
                    voting: voting.contains(&j),
                })
                .collect(),
            courses: (0..n)
                .map(|j| CourseListing {
                    course: format!("c{j}"),
                    faculty: format!("f{j}"),
                })
                .collect(),
            preferences: (0..n)
                .map(|j| PreferenceRow {
                    course: format!("c{j}"),
                    ranks: ranks_for(j),
                })
                .collect(),
            config: OptimizeConfig {
                seed: Some(7),
                time_limit_secs: None,
            },
        }
    }

    fn spread_ranks(j: usize) -> Vec<u32> {
        let mut ranks = vec![0; 10];
        for (offset, rank) in (1..=4).enumerate() {
            ranks[(j + offset) % 10] = rank;
        }
        ranks
    }

    #[test]
    fn every_course_gets_exactly_one_slot() {
        let result = optimize(&request(&[], spread_ranks)).unwrap();
        assert_eq!(result.entries.len(), 10);
        let mut courses: Vec<&str> = result.entries.iter().map(|e| e.course.as_str()).collect();
        courses.sort();
        courses.dedup();
        assert_eq!(courses.len(), 10);
        assert_eq!(result.stats.slot_counts.iter().sum::<u32>(), 10);
    }

    #[test]
    fn day_pattern_counts_respect_the_floor() {
        let result = optimize(&request(&[], spread_ranks)).unwrap();
        // ceil(10 / 2) - 1 = 4
        assert!(result.stats.mwf_count >= 4, "{:?}", result.stats);
        assert!(result.stats.tt_count >= 4, "{:?}", result.stats);
    }

    #[test]
    fn start_time_counts_stay_inside_the_band() {
        let result = optimize(&request(&[], spread_ranks)).unwrap();
        for (start, &count) in &result.stats.time_counts {
            // floor(10 / 5) = 2, cap 4
            assert!((2..=4).contains(&count), "start {start} has {count}");
        }
        assert!(result.stats.time_diff <= 2);
    }

    #[test]
    fn voting_faculty_never_land_on_the_reserved_slot() {
        // every course wants the reserved slot most of all
        let mut ranks = vec![0; 10];
        ranks[9] = 1;
        ranks[0] = 2;
        ranks[2] = 3;
        ranks[4] = 4;
        let voting = [0, 1, 2, 3, 4, 5];
        let result = optimize(&request(&voting, |_| ranks.clone())).unwrap();
        for &j in &voting {
            let entry = result
                .entries
                .iter()
                .find(|e| e.course == format!("c{j}"))
                .unwrap();
            assert_ne!(entry.slot, "s10", "voting course c{j} on reserved slot");
        }
    }

    #[test]
    fn without_voting_faculty_the_reserved_slot_is_open() {
        let mut ranks = vec![0; 10];
        ranks[9] = 1;
        let result = optimize(&request(&[], |_| ranks.clone())).unwrap();
        assert!(result.entries.iter().any(|e| e.slot == "s10"));
    }

    #[test]
    fn zero_courses_give_an_empty_result_without_solving() {
        let request = OptimizeRequest {
            faculty: Vec::new(),
            courses: Vec::new(),
            preferences: Vec::new(),
            config: OptimizeConfig::default(),
        };
        let result = optimize(&request).unwrap();
        assert!(result.entries.is_empty());
        assert_eq!(result.satisfaction_total, 0.0);
        assert_eq!(result.consensus_score, Some(0.0));
        assert_eq!(result.solve_time_ms, 0);
        assert!(result.slot_popularity.values().all(|&p| p == 0.5));
    }

    #[test]
    fn all_zero_preferences_still_produce_a_balanced_schedule() {
        let result = optimize(&request(&[], |_| vec![0; 10])).unwrap();
        assert_eq!(result.entries.len(), 10);
        assert_eq!(result.satisfaction_total, 0.0);
        assert_eq!(result.consensus_score, Some(0.0));
        assert!(result.slot_popularity.values().all(|&p| p == 0.5));
        assert!(result.stats.mwf_count >= 4);
        assert!(result.stats.tt_count >= 4);
        assert!(result.entries.iter().all(|e| e.satisfaction == 0.0));
    }

    #[test]
    fn short_rank_rows_are_rejected() {
        let mut bad = request(&[], spread_ranks);
        bad.preferences[3].ranks.truncate(4);
        let err = optimize(&bad).unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedInput(_)));
        assert!(err.to_string().contains("c3"));
    }

    #[test]
    fn pinned_seed_reproduces_the_schedule() {
        let req = request(&[], spread_ranks);
        let first = optimize(&req).unwrap();
        let second = optimize(&req).unwrap();
        assert_eq!(first.entries, second.entries);
        assert_eq!(first.satisfaction_total, second.satisfaction_total);
    }

    #[test]
    fn courses_on_a_requested_slot_beat_unranked_placements() {
        // all ten courses rank only s1; balance forces most elsewhere
        let mut ranks = vec![0; 10];
        ranks[0] = 1;
        let result = optimize(&request(&[], |_| ranks.clone())).unwrap();
        let on_favorite: Vec<_> = result.entries.iter().filter(|e| e.slot == "s1").collect();
        assert!(!on_favorite.is_empty());
        assert!(on_favorite.iter().all(|e| e.satisfaction > 0.0));
        assert!(
            result
                .entries
                .iter()
                .filter(|e| e.slot != "s1")
                .all(|e| e.satisfaction == 0.0)
        );
    }
}
