pub mod types;
pub mod slot_utils;
pub mod normalize;
pub mod intersection;

pub use types::{
    AnalysisResult, AvailabilityGrid, CommonSlot, Day, Participant, RawDaySchedule, RawTimeSlot,
    empty_raw_schedule, lenient_schedule, HOURS, SLOTS_PER_DAY,
};
pub use slot_utils::{calculate_slot_popularity, slot_to_time, SlotPopularity};
pub use normalize::normalize;
pub use intersection::compute_common_slots;
