//! Collects weekly student timetables, finds the hour slots every student is free at,
//! and attaches a generated summary of the result.

pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod schedule;
pub mod store;
pub mod summary;
pub mod web;

pub use schedule::{compute_common_slots, normalize, AnalysisResult, CommonSlot, Day, Participant};
pub use summary::Enricher;
