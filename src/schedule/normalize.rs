use std::collections::HashSet;
use log::debug;
use super::types::{AvailabilityGrid, Day, Participant, RawDaySchedule, SLOTS_PER_DAY};

/// Normalizes a submitted schedule into a fixed-size availability grid
///
/// Never fails on malformed input:
/// - days missing from `raw` stay all-busy
/// - slot positions past the last hour are dropped
/// - unknown day labels are skipped
/// - when a day appears more than once, the first occurrence wins
pub fn normalize(name: &str, raw: &[RawDaySchedule]) -> Participant {
    let mut grid = AvailabilityGrid::busy();
    let mut seen: HashSet<Day> = HashSet::new();

    for day_schedule in raw {
        let Some(day) = Day::parse(&day_schedule.day) else {
            debug!("{}: ignoring unknown day label {:?}", name, day_schedule.day);
            continue;
        };
        if !seen.insert(day) {
            continue;
        }

        if day_schedule.slots.len() > SLOTS_PER_DAY {
            debug!(
                "{}: dropping {} slot(s) past the last hour on {}",
                name,
                day_schedule.slots.len() - SLOTS_PER_DAY,
                day
            );
        }

        for (hour, slot) in day_schedule.slots.iter().take(SLOTS_PER_DAY).enumerate() {
            grid.set(day, hour, slot.is_selected);
        }
    }

    Participant::new(name, grid)
}
