//! Julian date handling.
//!
//! Timestamps flow through the crate as Julian dates (`f64` days). This module
//! converts them to and from calendar values and builds the regular sample grids
//! the calculator requests from an ephemeris provider.

pub mod grid;
pub mod jd;

pub use grid::SampleGrid;
pub use jd::{
    date_to_jd, datetime_to_jd, jd_to_date_string, jd_to_datetime, year_start_jd, JD_UNIX_EPOCH,
};
