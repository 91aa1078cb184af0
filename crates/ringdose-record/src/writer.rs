//! Row-oriented CSV writers for finished events.
//!
//! Both writers emit the header row on construction and one or more rows
//! per [`EventReport`]. Floats are written with Rust's shortest
//! round-trip formatting. A missing plane energy is an empty field.

use std::io::Write;

use ringdose_core::RegionIndex;
use ringdose_tracker::{EventObserver, EventReport};

use crate::error::RecordError;

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ── Per-event rows ──────────────────────────────────────────────

/// Writes one row per event.
///
/// Columns: `event,primaries,total_energy_kev,transmitted,absorbed,
/// scattered,secondaries,ring_0_kev,...,ring_<n-1>_kev,water_kev`.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use ringdose_record::EventRecordWriter;
///
/// let mut buf = Vec::new();
/// let writer = EventRecordWriter::new(&mut buf, 2).unwrap();
/// assert_eq!(writer.rows_written(), 0);
/// writer.finish().unwrap();
/// assert_eq!(
///     String::from_utf8(buf).unwrap(),
///     "event,primaries,total_energy_kev,transmitted,absorbed,scattered,\
///      secondaries,ring_0_kev,ring_1_kev,water_kev\n"
/// );
/// ```
pub struct EventRecordWriter<W: Write> {
    writer: W,
    region_count: u32,
    rows_written: u64,
    error: Option<RecordError>,
}

impl<W: Write> EventRecordWriter<W> {
    /// Create a writer for `region_count` rings, immediately writing the
    /// header row.
    pub fn new(mut writer: W, region_count: u32) -> Result<Self, RecordError> {
        write!(
            writer,
            "event,primaries,total_energy_kev,transmitted,absorbed,scattered,secondaries"
        )?;
        for ring in 0..region_count {
            write!(writer, ",ring_{ring}_kev")?;
        }
        writeln!(writer, ",water_kev")?;
        Ok(Self {
            writer,
            region_count,
            rows_written: 0,
            error: None,
        })
    }

    /// Write the row for `report`.
    pub fn write_event(&mut self, report: &EventReport) -> Result<(), RecordError> {
        write!(
            self.writer,
            "{},{},{},{},{},{},{}",
            report.event,
            report.primary_count(),
            report.total_primary_energy_kev(),
            report.transmitted_count(),
            report.absorbed_count(),
            report.scattered_count(),
            report.secondaries.len(),
        )?;
        for ring in 0..self.region_count {
            write!(self.writer, ",{}", report.region_deposit(RegionIndex(ring)))?;
        }
        writeln!(self.writer, ",{}", report.total_deposit_kev())?;
        self.rows_written += 1;
        Ok(())
    }

    /// Number of event rows written (excluding the header).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// The first error seen while observing events, if any.
    pub fn error(&self) -> Option<&RecordError> {
        self.error.as_ref()
    }

    /// Flush and return the sink, or the first error seen while
    /// observing events.
    pub fn finish(mut self) -> Result<W, RecordError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> EventObserver for EventRecordWriter<W> {
    fn on_event(&mut self, report: &EventReport) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_event(report) {
            self.error = Some(e);
        }
    }
}

// ── Per-primary rows ────────────────────────────────────────────

/// Writes one row per primary gamma.
///
/// Columns: `event,track,line,energy_kev,theta,phi,upstream_kev,
/// downstream_kev,fate`. Angles are in radians.
pub struct PrimaryRecordWriter<W: Write> {
    writer: W,
    rows_written: u64,
    error: Option<RecordError>,
}

impl<W: Write> PrimaryRecordWriter<W> {
    /// Create a writer, immediately writing the header row.
    pub fn new(mut writer: W) -> Result<Self, RecordError> {
        writeln!(
            writer,
            "event,track,line,energy_kev,theta,phi,upstream_kev,downstream_kev,fate"
        )?;
        Ok(Self {
            writer,
            rows_written: 0,
            error: None,
        })
    }

    /// Write one row per primary of `report`.
    pub fn write_event(&mut self, report: &EventReport) -> Result<(), RecordError> {
        for primary in &report.primaries {
            writeln!(
                self.writer,
                "{},{},{},{},{},{},{},{},{}",
                report.event,
                primary.id,
                primary.line,
                primary.energy_kev,
                primary.theta,
                primary.phi,
                optional(primary.energy_upstream()),
                optional(primary.energy_downstream()),
                primary.fate().map_or("pending", |f| f.label()),
            )?;
            self.rows_written += 1;
        }
        Ok(())
    }

    /// Number of primary rows written (excluding the header).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// The first error seen while observing events, if any.
    pub fn error(&self) -> Option<&RecordError> {
        self.error.as_ref()
    }

    /// Flush and return the sink, or the first error seen while
    /// observing events.
    pub fn finish(mut self) -> Result<W, RecordError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> EventObserver for PrimaryRecordWriter<W> {
    fn on_event(&mut self, report: &EventReport) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_event(report) {
            self.error = Some(e);
        }
    }
}
