//! Services built on top of the extractor.
//!
//! - [`calculator`]: chunked calculation over a year range for every configured
//!   body, producing a [`RetrogradeReport`](crate::io::report::RetrogradeReport)
//! - [`validation`]: comparison of computed periods with reference tables

pub mod calculator;
pub mod validation;


pub use calculator::{checked_samples, RetrogradeCalculator};
pub use validation::{
    validate_periods, MatchOutcome, PeriodValidation, ValidationReport, DEFAULT_TOLERANCE_DAYS,
};
