//! Persisting a finished run.

use std::io::Write;

use ringdose_engine::{DoseReport, LineStatistics, RunMetrics, RunResult};
use serde::Serialize;

use crate::error::RecordError;

/// Headline view of a [`RunResult`] for JSON output.
///
/// Leaves out the histograms, plane tallies and ring-by-line matrix;
/// serialize the [`RunResult`] itself when those are needed.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary<'a> {
    /// Events accumulated.
    pub events: u64,
    /// Primaries generated over those events.
    pub primaries: u64,
    /// Mean primaries per event.
    pub primaries_per_event: f64,
    /// Events with no primary.
    pub zero_primary_events: u64,
    /// Transmitted primaries.
    pub transmitted: u64,
    /// Absorbed primaries, any site.
    pub absorbed: u64,
    /// Scattered primaries.
    pub scattered: u64,
    /// Primaries with no applicable fate.
    pub unresolved: u64,
    /// Transmitted fraction of generated primaries.
    pub transmission_rate: f64,
    /// Per-line statistics in spectrum order.
    pub lines: &'a [LineStatistics],
    /// Normalized dose.
    pub dose: &'a DoseReport,
    /// Processing metrics.
    pub metrics: &'a RunMetrics,
}

impl<'a> From<&'a RunResult> for RunSummary<'a> {
    fn from(result: &'a RunResult) -> Self {
        let stats = &result.statistics;
        Self {
            events: stats.events,
            primaries: stats.total_primaries,
            primaries_per_event: stats.observed_primaries_per_event(),
            zero_primary_events: stats.zero_primary_events,
            transmitted: stats.transmitted,
            absorbed: stats.absorbed,
            scattered: stats.scattered,
            unresolved: stats.unresolved,
            transmission_rate: stats.transmission_rate(),
            lines: &stats.lines,
            dose: &result.dose,
            metrics: &result.metrics,
        }
    }
}

/// Write the [`RunSummary`] of `result` as pretty-printed JSON.
pub fn write_summary_json<W: Write>(result: &RunResult, mut writer: W) -> Result<(), RecordError> {
    serde_json::to_writer_pretty(&mut writer, &RunSummary::from(result))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// The [`RunSummary`] of `result` as compact JSON.
pub fn summary_to_string(result: &RunResult) -> Result<String, RecordError> {
    Ok(serde_json::to_string(&RunSummary::from(result))?)
}

/// Write the per-ring dose table, followed by a `total` row, as CSV.
///
/// The total row leaves the radius columns empty.
pub fn write_dose_table<W: Write>(report: &DoseReport, mut writer: W) -> Result<(), RecordError> {
    writeln!(
        writer,
        "ring,inner_mm,outer_mm,mass_kg,energy_kev,events,dose_gy,\
         rate_gy_per_s,rate_ngy_per_h,rate_error_ngy_per_h,relative_error,reliable"
    )?;
    for row in &report.regions {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            row.index,
            row.inner_radius_mm,
            row.outer_radius_mm,
            row.mass_kg,
            row.energy_kev,
            row.event_count,
            row.dose_gy,
            row.dose_rate_gy_per_s,
            row.dose_rate_ngy_per_h,
            row.dose_rate_error_ngy_per_h(),
            row.relative_error,
            row.reliable,
        )?;
    }
    let total = &report.total;
    writeln!(
        writer,
        "total,,,{},{},{},{},{},{},{},{},{}",
        total.mass_kg,
        total.energy_kev,
        total.event_count,
        total.dose_gy,
        total.dose_rate_gy_per_s,
        total.dose_rate_ngy_per_h,
        total.dose_rate_ngy_per_h * total.relative_error,
        total.relative_error,
        total.reliable,
    )?;
    writer.flush()?;
    Ok(())
}
