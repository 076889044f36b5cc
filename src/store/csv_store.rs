use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use crate::error::StoreError;
use super::{sort_newest_first, NewStudent, StudentRecord, StudentStore};

/// One CSV line; the schedule is kept as a JSON document in its own column
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    id: String,
    name: String,
    reg_no: String,
    roll_no: String,
    schedule: String,
    created_at: String,
}

impl CsvRow {
    fn from_record(record: &StudentRecord) -> Result<Self, StoreError> {
        Ok(CsvRow {
            id: record.id.clone(),
            name: record.name.clone(),
            reg_no: record.reg_no.clone(),
            roll_no: record.roll_no.clone(),
            schedule: serde_json::to_string(&record.schedule)?,
            created_at: record.created_at.to_rfc3339(),
        })
    }

    fn into_record(self) -> Result<StudentRecord, StoreError> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|source| StoreError::Timestamp {
                value: self.created_at.clone(),
                source,
            })?
            .with_timezone(&Utc);

        Ok(StudentRecord {
            id: self.id,
            name: self.name,
            reg_no: self.reg_no,
            roll_no: self.roll_no,
            schedule: serde_json::from_str(&self.schedule)?,
            created_at,
        })
    }
}

/// Stores student submissions in a single append-only CSV file
pub struct CsvStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &StudentRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Header only goes in when the file is new or empty
        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;

        let mut wtr = WriterBuilder::new().has_headers(needs_header).from_writer(file);
        wtr.serialize(CsvRow::from_record(record)?)?;
        wtr.flush()?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<StudentRecord>, StoreError> {
        if !self.path.exists() {
            debug!("{} does not exist yet, no students stored", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new().has_headers(true).from_path(&self.path)?;
        let mut records = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row?;
            let id = row.id.clone();
            match row.into_record() {
                Ok(record) => records.push(record),
                // Skip records we can't decode, keep the rest
                Err(e) => warn!("Skipping student {:?} on data row {} of {}: {}", id, line + 1, self.path.display(), e),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl StudentStore for CsvStore {
    async fn save(&self, student: NewStudent) -> Result<StudentRecord, StoreError> {
        let record = StudentRecord::from_new(student, Utc::now());
        let _guard = self.lock.lock().await;
        self.append(&record)?;
        info!("Saved student {} ({}) to {}", record.name, record.id, self.path.display());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all()?;
        sort_newest_first(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use super::*;
    use crate::store::tests::new_student;

    #[tokio::test]
    async fn missing_file_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("students.csv"));

        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn saved_students_come_back_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("nested").join("students.csv"));

        let first = store.save(new_student("Asha", &[true, false, true])).await.unwrap();
        let second = store.save(new_student("Ben, Jr.", &[true])).await.unwrap();

        let records = store.list_all().await.unwrap();
        assert_eq!(records, vec![second, first]);

        let header_lines = fs::read_to_string(store.path())
            .unwrap()
            .lines()
            .filter(|line| line.starts_with("id,"))
            .count();
        assert_eq!(header_lines, 1);
    }

    #[tokio::test]
    async fn undecodable_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("students.csv"));
        let good = store.save(new_student("Good", &[true])).await.unwrap();

        let mut file = OpenOptions::new().append(true).open(store.path()).unwrap();
        writeln!(file, "x,Bad,R,1,not-json,2024-01-01T00:00:00Z").unwrap();
        writeln!(file, "y,Late,R,2,[],yesterday").unwrap();

        assert_eq!(store.list_all().await.unwrap(), vec![good]);
    }

    #[tokio::test]
    async fn broken_csv_is_still_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(&path, "id,name,reg_no,roll_no,schedule,created_at\n1,Asha\n").unwrap();

        let store = CsvStore::new(path);
        assert!(matches!(store.list_all().await, Err(StoreError::Csv(_))));
    }
}
