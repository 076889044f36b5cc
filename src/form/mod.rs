pub mod submission;

pub use submission::{StudentSubmission, validate_submission};
