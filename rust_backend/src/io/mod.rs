//! Report serialization.
//!
//! A run produces one [`RetrogradeReport`]: run metadata plus, per body, the
//! list of periods with calendar dates and Julian dates, the period count and
//! the average number of periods per year. Reports are plain JSON so web front
//! ends can consume them directly, optionally with a gzip-compressed copy.
//!
//! # Example
//!
//! ```no_run
//! use retrograde_rust::io::report::RetrogradeReport;
//! use std::path::Path;
//!
//! let report = RetrogradeReport::from_file(Path::new("retrograde_periods.json"))
//!     .expect("Failed to load report");
//! for line in report.summary_lines() {
//!     println!("{}", line);
//! }
//! ```

pub mod report;


pub use report::{
    average_per_year, BodyRetrogrades, PeriodRecord, ReportMetadata, RetrogradeReport,
    SavedReport, YearSpan,
};
