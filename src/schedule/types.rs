use std::fmt;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of bookable hour slots in one day
pub const SLOTS_PER_DAY: usize = 8;

/// Display labels for each hour slot, indexed by slot number
pub const HOURS: [&str; SLOTS_PER_DAY] = [
    "9:00 - 10:00",
    "10:00 - 11:00",
    "11:00 - 12:00",
    "12:00 - 13:00",
    "13:00 - 14:00",
    "14:00 - 15:00",
    "15:00 - 16:00",
    "16:00 - 17:00",
];

/// Day of the week a slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days in canonical (display and output) order
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    /// Parses a day label, ignoring case and surrounding whitespace
    pub fn parse(label: &str) -> Option<Day> {
        let label = label.trim();
        Day::ALL
            .iter()
            .copied()
            .find(|day| day.name().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One participant's week of free (true) / busy (false) hour slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AvailabilityGrid([[bool; SLOTS_PER_DAY]; 7]);

impl AvailabilityGrid {
    /// A grid where every slot is busy
    pub fn busy() -> Self {
        AvailabilityGrid([[false; SLOTS_PER_DAY]; 7])
    }

    /// A grid where every slot is free
    pub fn free() -> Self {
        AvailabilityGrid([[true; SLOTS_PER_DAY]; 7])
    }

    /// Builds a grid with exactly the given slots free; out-of-range hours are ignored
    pub fn from_slots<I>(slots: I) -> Self
    where
        I: IntoIterator<Item = (Day, usize)>,
    {
        let mut grid = AvailabilityGrid::busy();
        for (day, hour) in slots {
            grid.set(day, hour, true);
        }
        grid
    }

    pub fn is_free(&self, day: Day, hour: usize) -> bool {
        self.0[day.index()].get(hour).copied().unwrap_or(false)
    }

    pub fn set(&mut self, day: Day, hour: usize, free: bool) {
        if let Some(slot) = self.0[day.index()].get_mut(hour) {
            *slot = free;
        }
    }

    pub fn day(&self, day: Day) -> &[bool; SLOTS_PER_DAY] {
        &self.0[day.index()]
    }

    /// Hour indexes that are free on `day`, ascending
    pub fn free_hours(&self, day: Day) -> impl Iterator<Item = usize> + '_ {
        self.0[day.index()]
            .iter()
            .enumerate()
            .filter(|(_, free)| **free)
            .map(|(hour, _)| hour)
    }

    pub fn free_slot_count(&self) -> usize {
        self.0.iter().flatten().filter(|free| **free).count()
    }

    /// Keeps only the slots that are also free in `other`
    pub fn intersect_with(&mut self, other: &AvailabilityGrid) {
        for (row, other_row) in self.0.iter_mut().zip(other.0.iter()) {
            for (slot, other_slot) in row.iter_mut().zip(other_row.iter()) {
                *slot &= *other_slot;
            }
        }
    }
}

/// A named participant and their normalized weekly availability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub grid: AvailabilityGrid,
}

impl Participant {
    pub fn new(name: impl Into<String>, grid: AvailabilityGrid) -> Self {
        Participant {
            name: name.into(),
            grid,
        }
    }
}

/// A (day, hour) slot every analysed participant is free at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonSlot {
    pub day: Day,
    pub hour: usize,
    pub students: Vec<String>,
}

/// Computed common slots together with the narrative summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub common_slots: Vec<CommonSlot>,
    pub ai_summary: String,
    pub last_updated: DateTime<Utc>,
}

impl AnalysisResult {
    /// Common slots falling on `day`, in hour order
    pub fn slots_for_day(&self, day: Day) -> Vec<&CommonSlot> {
        self.common_slots.iter().filter(|slot| slot.day == day).collect()
    }
}

/// A single hour slot as submitted by the intake form
///
/// `hour` is informational; the slot's position in its day decides the hour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimeSlot {
    #[serde(default, deserialize_with = "or_default", skip_serializing_if = "Option::is_none")]
    pub hour: Option<i64>,
    #[serde(default, deserialize_with = "or_default")]
    pub is_selected: bool,
}

/// One day of a submitted schedule; slot position is the hour index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDaySchedule {
    #[serde(default, deserialize_with = "or_default")]
    pub day: String,
    #[serde(default, deserialize_with = "lenient_slots")]
    pub slots: Vec<RawTimeSlot>,
}

/// An all-busy raw week, the shape a blank intake form starts from
pub fn empty_raw_schedule() -> Vec<RawDaySchedule> {
    Day::ALL
        .iter()
        .map(|day| RawDaySchedule {
            day: day.name().to_string(),
            slots: (0..SLOTS_PER_DAY as i64)
                .map(|hour| RawTimeSlot { hour: Some(hour), is_selected: false })
                .collect(),
        })
        .collect()
}

/// Reads a submitted schedule without ever rejecting it
///
/// Day entries that are not objects are dropped; anything wrong inside an entry is
/// left for `normalize` to treat as busy or unknown.
pub fn lenient_schedule<'de, D>(deserializer: D) -> Result<Vec<RawDaySchedule>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<serde_json::Value> = or_default(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

// Wrong-shaped values fall back to the type's default instead of failing the whole document
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

// Unreadable slots stay in place as busy so later positions keep their hour
fn lenient_slots<'de, D>(deserializer: D) -> Result<Vec<RawTimeSlot>, D::Error>
where
    D: Deserializer<'de>,
{
    let slots: Vec<serde_json::Value> = or_default(deserializer)?;
    Ok(slots
        .into_iter()
        .map(|slot| serde_json::from_value(slot).unwrap_or_default())
        .collect())
}
