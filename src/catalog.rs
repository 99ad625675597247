/// The weekly meeting-day grouping of a time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPattern {
    Mwf,
    Tt,
}

/// A single schedulable meeting time.
#[derive(Debug, Clone)]
pub struct TimeSlot {
    pub code: &'static str,
    pub label: &'static str,
    pub pattern: DayPattern,
    pub start: &'static str,
    pub end: &'static str,
}

/// The five start times shared by both day patterns, in slot order.
pub const START_TIMES: [&str; 5] = ["9:00", "10:30", "12:00", "1:30", "3:00"];

/// The fixed catalog of weekly time slots.
///
/// Ten slots, evenly split between MWF and TT, two slots per start time
/// (one per day pattern). One slot is reserved as the faculty meeting time.
pub struct SlotCatalog {
    slots: Vec<TimeSlot>,
    exclusion: usize,
}

impl SlotCatalog {
    pub fn standard() -> Self {
        let slots = vec![
            slot("s1", "MWF 9:00-10:15", DayPattern::Mwf, "9:00", "10:15"),
            slot("s2", "TT 9:00-10:15", DayPattern::Tt, "9:00", "10:15"),
            slot("s3", "MWF 10:30-11:45", DayPattern::Mwf, "10:30", "11:45"),
            slot("s4", "TT 10:30-11:45", DayPattern::Tt, "10:30", "11:45"),
            slot("s5", "MWF 12:00-1:15", DayPattern::Mwf, "12:00", "1:15"),
            slot("s6", "TT 12:00-1:15", DayPattern::Tt, "12:00", "1:15"),
            slot("s7", "MWF 1:30-2:45", DayPattern::Mwf, "1:30", "2:45"),
            slot("s8", "TT 1:30-2:45", DayPattern::Tt, "1:30", "2:45"),
            slot("s9", "MWF 3:00-4:15", DayPattern::Mwf, "3:00", "4:15"),
            slot("s10", "TT 3:00-4:15", DayPattern::Tt, "3:00", "4:15"),
        ];
        // the TT 3:00 slot is held for the faculty senate meeting
        SlotCatalog {
            slots,
            exclusion: 9,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> &TimeSlot {
        &self.slots[index]
    }

    /// Slot indices belonging to the given day pattern.
    pub fn pattern_indices(&self, pattern: DayPattern) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.pattern == pattern)
            .map(|(i, _)| i)
            .collect()
    }

    /// Slot indices sharing the given start time.
    pub fn start_time_indices(&self, start: &str) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.start == start)
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the slot reserved against voting-faculty courses.
    pub fn exclusion_slot(&self) -> usize {
        self.exclusion
    }
}

fn slot(
    code: &'static str,
    label: &'static str,
    pattern: DayPattern,
    start: &'static str,
    end: &'static str,
) -> TimeSlot {
    TimeSlot {
        code,
        label,
        pattern,
        start,
        end,
    }
}
