//! Vitals Model
//!
//! Core types for the monitored vital signs:
//! - [`VitalKind`]: the three tracked vitals and their physiological ranges
//! - [`Reading`]: per-metric validation outcome
//! - [`ValidatedSample`]: one validated payload (partial-validity policy)
//! - [`SampleHistory`]: the bounded history buffer backing the chart

mod history;
mod types;

pub use history::{time_label, HistoryPoint, HistorySeries, SampleHistory, DEFAULT_CAPACITY};
pub use types::{Reading, ValidatedSample, VitalKind, PLACEHOLDER};
