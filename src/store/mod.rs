pub mod csv_store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use crate::error::StoreError;
use crate::schedule::{normalize, Participant, RawDaySchedule};

pub use csv_store::CsvStore;

/// A student submission that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub reg_no: String,
    pub roll_no: String,
    pub schedule: Vec<RawDaySchedule>,
}

/// A stored student submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub reg_no: String,
    pub roll_no: String,
    pub schedule: Vec<RawDaySchedule>,
    pub created_at: DateTime<Utc>,
}

impl StudentRecord {
    pub fn from_new(student: NewStudent, created_at: DateTime<Utc>) -> Self {
        StudentRecord {
            id: new_record_id(),
            name: student.name,
            reg_no: student.reg_no,
            roll_no: student.roll_no,
            schedule: student.schedule,
            created_at,
        }
    }

    pub fn to_participant(&self) -> Participant {
        normalize(&self.name, &self.schedule)
    }
}

/// Maps stored records to participants, keeping their order
pub fn to_participants(records: &[StudentRecord]) -> Vec<Participant> {
    records.iter().map(StudentRecord::to_participant).collect()
}

fn new_record_id() -> String {
    format!("{:016x}", rand::random::<u64>())
}

/// Newest first; equal timestamps keep insertion order reversed
fn sort_newest_first(records: &mut [StudentRecord]) {
    records.reverse();
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Persistence for student submissions
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn save(&self, student: NewStudent) -> Result<StudentRecord, StoreError>;

    /// All records, most recently created first
    async fn list_all(&self) -> Result<Vec<StudentRecord>, StoreError>;
}

/// In-process store, lost on restart
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<StudentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn save(&self, student: NewStudent) -> Result<StudentRecord, StoreError> {
        let record = StudentRecord::from_new(student, Utc::now());
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let mut records = self.records.lock().await.clone();
        sort_newest_first(&mut records);
        Ok(records)
    }
}
