use serde::Serialize;
use crate::schedule::{slot_to_time, CommonSlot, Day, Participant};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DayFreeSlots {
    day: Day,
    free_slots: Vec<&'static str>,
}

#[derive(Serialize)]
struct ParticipantSummary<'a> {
    name: &'a str,
    schedule: Vec<DayFreeSlots>,
}

#[derive(Serialize)]
struct CommonSlotLabel {
    day: Day,
    time: &'static str,
}

/// Builds the summarizer prompt from participant schedules and the computed common slots
pub fn build_prompt(participants: &[Participant], common_slots: &[CommonSlot]) -> String {
    let schedules: Vec<ParticipantSummary> = participants
        .iter()
        .map(|participant| ParticipantSummary {
            name: &participant.name,
            schedule: Day::ALL
                .iter()
                .map(|&day| DayFreeSlots {
                    day,
                    free_slots: participant.grid.free_hours(day).filter_map(slot_to_time).collect(),
                })
                .collect(),
        })
        .collect();

    let common: Vec<CommonSlotLabel> = common_slots
        .iter()
        .filter_map(|slot| slot_to_time(slot.hour).map(|time| CommonSlotLabel { day: slot.day, time }))
        .collect();

    format!(
        "Analyze the following student timetable data and provide insights:\n\n\
         Student Schedules:\n{}\n\n\
         Common Free Slots Found:\n{}\n\n\
         Please provide:\n\
         1. A concise summary of the common free slots\n\
         2. Recommendations for the best meeting times based on the data\n\
         3. Any patterns you notice in the students' availability\n\n\
         Respond in a concise, helpful format suitable for a timetable coordination system.",
        to_pretty_json(&schedules),
        to_pretty_json(&common),
    )
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    // Plain structs of strings and enums cannot fail to serialize
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{compute_common_slots, AvailabilityGrid};

    #[test]
    fn prompt_lists_free_and_common_slots_by_label() {
        let participants = vec![
            Participant::new("Asha", AvailabilityGrid::from_slots([(Day::Monday, 0), (Day::Friday, 2)])),
            Participant::new("Ben", AvailabilityGrid::from_slots([(Day::Monday, 0)])),
        ];
        let common = compute_common_slots(&participants);

        let prompt = build_prompt(&participants, &common);

        assert!(prompt.contains("\"name\": \"Asha\""));
        assert!(prompt.contains("\"freeSlots\""));
        assert!(prompt.contains("11:00 - 12:00"));
        let common_section = prompt.split("Common Free Slots Found:").nth(1).unwrap();
        assert!(common_section.contains("\"day\": \"Monday\""));
        assert!(common_section.contains("\"time\": \"9:00 - 10:00\""));
        assert!(!common_section.contains("11:00 - 12:00"));
    }
}
