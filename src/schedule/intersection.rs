use log::debug;
use super::types::{AvailabilityGrid, CommonSlot, Day, Participant};

/// Finds every slot at which all `participants` are free
///
/// The grids are folded into a single mask (one pass over participants x days x hours),
/// then the mask is walked day-major, hour-minor. Each resulting slot lists every
/// participant name in input order; duplicate names are kept as given.
///
/// An empty participant list yields no slots.
pub fn compute_common_slots(participants: &[Participant]) -> Vec<CommonSlot> {
    let Some(mask) = common_mask(participants) else {
        return Vec::new();
    };

    let students: Vec<String> = participants.iter().map(|p| p.name.clone()).collect();
    let common_slots: Vec<CommonSlot> = Day::ALL
        .iter()
        .flat_map(|&day| {
            mask.free_hours(day)
                .map(move |hour| (day, hour))
                .collect::<Vec<_>>()
        })
        .map(|(day, hour)| CommonSlot {
            day,
            hour,
            students: students.clone(),
        })
        .collect();

    debug!(
        "{} common slot(s) across {} participant(s)",
        common_slots.len(),
        participants.len()
    );
    common_slots
}

/// The AND of every participant's grid, or `None` for an empty list
fn common_mask(participants: &[Participant]) -> Option<AvailabilityGrid> {
    let (first, rest) = participants.split_first()?;
    let mut mask = first.grid;
    for participant in rest {
        mask.intersect_with(&participant.grid);
    }
    Some(mask)
}
