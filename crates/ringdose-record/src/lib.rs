//! Result sinks for ringdose runs.
//!
//! Two row-oriented writers consume finished events as they are produced,
//! and two functions persist the finalized run:
//!
//! - [`EventRecordWriter`] writes one CSV row per event (counts and
//!   per-ring deposit)
//! - [`PrimaryRecordWriter`] writes one CSV row per primary gamma
//!   (initial kinematics, plane energies, fate)
//! - [`write_dose_table`] writes the per-ring dose table as CSV
//! - [`write_summary_json`] writes the whole [`RunResult`] as JSON
//!
//! Both writers are [`EventObserver`]s. Observers cannot fail, so a write
//! error is stored, later events are skipped, and the error is returned
//! from `finish()`.
//!
//! [`RunResult`]: ringdose_engine::RunResult
//! [`EventObserver`]: ringdose_tracker::EventObserver

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod summary;
pub mod writer;

pub use error::RecordError;
pub use summary::{summary_to_string, write_dose_table, write_summary_json, RunSummary};
pub use writer::{EventRecordWriter, PrimaryRecordWriter};
