use serde::Serialize;
use super::types::{Day, Participant, HOURS, SLOTS_PER_DAY};

/// Converts a slot index to its display label
pub fn slot_to_time(hour: usize) -> Option<&'static str> {
    HOURS.get(hour).copied()
}

/// How many analysed participants are free at one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPopularity {
    pub day: Day,
    pub hour: usize,
    pub time: &'static str,
    pub free_count: usize,
    pub students: Vec<String>,
}

/// Counts, for every (day, hour) slot, which participants are free there
/// Returned in day-major, hour-minor order; slots nobody is free at are included with a zero count
pub fn calculate_slot_popularity(participants: &[Participant]) -> Vec<SlotPopularity> {
    let mut popularity = Vec::with_capacity(Day::ALL.len() * SLOTS_PER_DAY);
    for day in Day::ALL {
        for (hour, time) in HOURS.iter().enumerate() {
            let students: Vec<String> = participants
                .iter()
                .filter(|p| p.grid.is_free(day, hour))
                .map(|p| p.name.clone())
                .collect();
            popularity.push(SlotPopularity {
                day,
                hour,
                time,
                free_count: students.len(),
                students,
            });
        }
    }
    popularity
}
