//! Record shapes exchanged with the persistence collaborator.

pub mod records;

pub use records::{LogRecord, RecordValue, RunRecord};
