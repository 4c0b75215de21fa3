//! Closure-backed ephemeris provider.

use qtty::Degrees;

use super::{EphemerisError, EphemerisProvider, EphemerisResult};
use crate::core::domain::ObservationPair;

/// Julian date at which `supports` asks the closure for a pair (J2000.0)
const SUPPORT_CHECK_JD: f64 = 2451545.0;

/// Provider that evaluates a function `(pair, jd) -> longitude in degrees`.
///
/// Returning `None` means the pair is not available. Values are passed through
/// untouched; the calculator normalizes them into [0, 360).
pub struct FnEphemeris<F> {
    name: String,
    longitude: F,
}

impl<F> FnEphemeris<F>
where
    F: Fn(ObservationPair, f64) -> Option<f64>,
{
    pub fn new(name: impl Into<String>, longitude: F) -> Self {
        Self {
            name: name.into(),
            longitude,
        }
    }
}

impl<F> EphemerisProvider for FnEphemeris<F>
where
    F: Fn(ObservationPair, f64) -> Option<f64>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, pair: ObservationPair) -> bool {
        (self.longitude)(pair, SUPPORT_CHECK_JD).is_some()
    }

    fn ecliptic_longitudes(
        &self,
        pair: ObservationPair,
        times: &[f64],
    ) -> EphemerisResult<Vec<Degrees>> {
        times
            .iter()
            .map(|&jd| {
                (self.longitude)(pair, jd)
                    .map(Degrees::new)
                    .ok_or_else(|| EphemerisError::BodyNotFound {
                        provider: self.name.clone(),
                        pair,
                    })
            })
            .collect()
    }
}
