use crate::catalog::{DayPattern, START_TIMES, SlotCatalog};
use crate::data::ScheduleStats;
use std::collections::BTreeMap;

/// Descriptive statistics over a realized assignment: pure aggregation,
/// no solver interaction, no randomness.
///
/// `assigned_slots` holds one slot index per course.
pub fn summarize(assigned_slots: &[usize], catalog: &SlotCatalog) -> ScheduleStats {
    let mut slot_counts = vec![0u32; catalog.len()];
    for &slot in assigned_slots {
        slot_counts[slot] += 1;
    }

    let group_count = |indices: Vec<usize>| -> u32 { indices.iter().map(|&i| slot_counts[i]).sum() };

    let mwf_count = group_count(catalog.pattern_indices(DayPattern::Mwf));
    let tt_count = group_count(catalog.pattern_indices(DayPattern::Tt));

    let mut time_counts = BTreeMap::new();
    for start in START_TIMES {
        time_counts.insert(
            start.to_string(),
            group_count(catalog.start_time_indices(start)),
        );
    }
    let max_time = time_counts.values().copied().max().unwrap_or(0);
    let min_time = time_counts.values().copied().min().unwrap_or(0);

    ScheduleStats {
        mwf_count,
        tt_count,
        balance_diff: mwf_count.abs_diff(tt_count),
        time_diff: max_time - min_time,
        time_counts,
        slot_counts,
    }
}
