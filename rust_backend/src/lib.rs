//! Retrograde period extraction from ecliptic longitude series.
//!
//! Longitudes come from an [`ephemeris::EphemerisProvider`]; the
//! [`algorithms::retrograde`] extractor turns them into periods, and
//! [`services::calculator`] drives the extractor over long year ranges in
//! windows and assembles a JSON [`io::report::RetrogradeReport`].

pub mod algorithms;
pub mod config;
pub mod core;
pub mod ephemeris;
pub mod error;
pub mod io;
pub mod parsing;
pub mod services;
pub mod time;

pub use error::{Result, RetrogradeError};
