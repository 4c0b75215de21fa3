//! Ephemeris access.
//!
//! Positions are never computed here: they come from an [`EphemerisProvider`],
//! a capability passed explicitly to whoever needs longitudes. This module
//! defines the trait and the providers shipped with the crate.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for ephemeris access
//! - [`table`]: Precomputed longitude tables (JSON files or built in code)
//! - [`function`]: Closure-backed provider for synthetic series
//! - [`tiered`]: Primary/fallback selection by date range
//!
//! # Example
//!
//! ```
//! use retrograde_rust::core::domain::{Body, ObservationPair};
//! use retrograde_rust::ephemeris::{EphemerisProvider, FnEphemeris};
//!
//! // Longitude that creeps forward one degree per day
//! let provider = FnEphemeris::new("linear", |_pair: ObservationPair, jd: f64| Some(jd % 360.0));
//! let pair = ObservationPair::new(Body::Earth, Body::Mars);
//!
//! let longitudes = provider.ecliptic_longitudes(pair, &[10.0, 11.0]).unwrap();
//! assert_eq!(longitudes[1].value(), 11.0);
//! ```

pub mod error;
pub mod function;
pub mod table;
pub mod tiered;

pub use error::{EphemerisError, EphemerisResult};
pub use function::FnEphemeris;
pub use table::TableEphemeris;
pub use tiered::TieredEphemeris;

use std::ops::RangeInclusive;

use qtty::Degrees;

use crate::core::domain::ObservationPair;

/// Source of apparent ecliptic longitudes of one body as seen from another.
pub trait EphemerisProvider {
    /// Human-readable provider name, used in logs and report metadata.
    fn name(&self) -> &str;

    /// Whether this provider can answer for `pair` at all.
    fn supports(&self, pair: ObservationPair) -> bool;

    /// Ecliptic longitude of `pair.observed` seen from `pair.observer` at each
    /// Julian date in `times`, one value per requested time, in order.
    fn ecliptic_longitudes(
        &self,
        pair: ObservationPair,
        times: &[f64],
    ) -> EphemerisResult<Vec<Degrees>>;

    /// Years each underlying tier answers for during a run over `run_years`,
    /// keyed by tier name. Empty for single-source providers.
    fn tier_years(&self, _run_years: RangeInclusive<i32>) -> Vec<(String, RangeInclusive<i32>)> {
        Vec::new()
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn supports(&self, pair: ObservationPair) -> bool {
        (**self).supports(pair)
    }

    fn ecliptic_longitudes(
        &self,
        pair: ObservationPair,
        times: &[f64],
    ) -> EphemerisResult<Vec<Degrees>> {
        (**self).ecliptic_longitudes(pair, times)
    }

    fn tier_years(&self, run_years: RangeInclusive<i32>) -> Vec<(String, RangeInclusive<i32>)> {
        (**self).tier_years(run_years)
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn supports(&self, pair: ObservationPair) -> bool {
        (**self).supports(pair)
    }

    fn ecliptic_longitudes(
        &self,
        pair: ObservationPair,
        times: &[f64],
    ) -> EphemerisResult<Vec<Degrees>> {
        (**self).ecliptic_longitudes(pair, times)
    }

    fn tier_years(&self, run_years: RangeInclusive<i32>) -> Vec<(String, RangeInclusive<i32>)> {
        (**self).tier_years(run_years)
    }
}
