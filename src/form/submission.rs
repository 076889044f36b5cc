use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::schedule::{empty_raw_schedule, RawDaySchedule};
use crate::store::NewStudent;

/// Student submission request from the intake form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub reg_no: String,
    #[serde(default)]
    pub roll_no: String,
    #[serde(default = "empty_raw_schedule", deserialize_with = "crate::schedule::lenient_schedule")]
    pub schedule: Vec<RawDaySchedule>,
}

/// Validates a submission; only the identity fields are checked, the schedule is normalized later
pub fn validate_submission(req: &StudentSubmission) -> Result<(), ValidationError> {
    if req.name.trim().is_empty() {
        return Err(ValidationError::MissingField("name"));
    }
    if req.reg_no.trim().is_empty() {
        return Err(ValidationError::MissingField("regNo"));
    }
    if req.roll_no.trim().is_empty() {
        return Err(ValidationError::MissingField("rollNo"));
    }
    Ok(())
}

impl StudentSubmission {
    /// Validates and converts into a record ready to be stored
    pub fn into_new_student(self) -> Result<NewStudent, ValidationError> {
        validate_submission(&self)?;
        Ok(NewStudent {
            name: self.name.trim().to_string(),
            reg_no: self.reg_no.trim().to_string(),
            roll_no: self.roll_no.trim().to_string(),
            schedule: self.schedule,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, reg_no: &str, roll_no: &str) -> StudentSubmission {
        StudentSubmission {
            name: name.to_string(),
            reg_no: reg_no.to_string(),
            roll_no: roll_no.to_string(),
            schedule: empty_raw_schedule(),
        }
    }

    #[test]
    fn blank_fields_are_rejected_in_form_order() {
        assert_eq!(validate_submission(&submission("  ", "", "")), Err(ValidationError::MissingField("name")));
        assert_eq!(validate_submission(&submission("Asha", " ", "")), Err(ValidationError::MissingField("regNo")));
        assert_eq!(validate_submission(&submission("Asha", "R1", "")), Err(ValidationError::MissingField("rollNo")));
    }

    #[test]
    fn valid_submission_is_trimmed() {
        let student = submission(" Asha ", " 21BCE001 ", " 17 ").into_new_student().unwrap();

        assert_eq!(student.name, "Asha");
        assert_eq!(student.reg_no, "21BCE001");
        assert_eq!(student.roll_no, "17");
        assert_eq!(student.schedule.len(), 7);
    }

    #[test]
    fn missing_schedule_defaults_to_blank_week() {
        let req: StudentSubmission =
            serde_json::from_str(r#"{"name":"Asha","regNo":"R1","rollNo":"1"}"#).unwrap();
        assert_eq!(req.schedule, empty_raw_schedule());
    }

    #[test]
    fn non_object_day_entries_are_dropped() {
        let req: StudentSubmission = serde_json::from_str(
            r#"{"name":"Asha","regNo":"R1","rollNo":"1","schedule":[null,"Monday",{"day":"Friday","slots":[]}]}"#,
        )
        .unwrap();

        assert_eq!(req.schedule.len(), 1);
        assert_eq!(req.schedule[0].day, "Friday");
    }
}
