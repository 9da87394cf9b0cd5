//! daybreak-core
//!
//! Pure domain types for the check-in pipeline: the clinical assessment
//! schema, the persisted daily log, and caller identity. No network
//! dependency — this is the shared vocabulary of the Daybreak system.

pub mod error;
pub mod models;
