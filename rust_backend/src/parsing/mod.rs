//! Parsers for reference data.
//!
//! # Parsers
//!
//! - [`reference_csv`]: Published retrograde tables (`Start Date`, `End Date`
//!   columns, `14-Jan-2024` dates) used to spot-check computed periods
//!
//! # Example
//!
//! ```no_run
//! use retrograde_rust::parsing::reference_csv::parse_reference_csv;
//! use std::path::Path;
//!
//! let periods = parse_reference_csv(Path::new("mercury_retrogrades.csv"))
//!     .expect("Failed to parse reference table");
//! println!("Loaded {} reference periods", periods.len());
//! ```

pub mod reference_csv;


pub use reference_csv::{parse_reference_csv, ReferencePeriod};
