//! Primary/fallback ephemeris selection.
//!
//! High-precision ephemerides cover a limited span (DE440: 1550–2650) while
//! long-span ones (DE441) cover millennia at lower precision. A
//! [`TieredEphemeris`] answers each request from the primary provider when the
//! request's midpoint year lies in the primary span and from the fallback
//! otherwise. A provider that does not carry the pair hands over to the other;
//! if that one cannot answer either, the pair counts as not found for the
//! request.

use std::ops::RangeInclusive;

use chrono::Datelike;
use qtty::Degrees;

use super::{EphemerisError, EphemerisProvider, EphemerisResult};
use crate::core::domain::ObservationPair;
use crate::time::jd_to_datetime;

pub struct TieredEphemeris<P, F> {
    name: String,
    primary: P,
    fallback: F,
    primary_years: RangeInclusive<i32>,
}

impl<P, F> TieredEphemeris<P, F>
where
    P: EphemerisProvider,
    F: EphemerisProvider,
{
    pub fn new(primary: P, fallback: F, primary_years: RangeInclusive<i32>) -> Self {
        let name = format!("{} / {}", primary.name(), fallback.name());
        Self {
            name,
            primary,
            fallback,
            primary_years,
        }
    }

    /// Whether a request for `times` goes to the primary provider first.
    pub fn prefers_primary(&self, times: &[f64]) -> bool {
        let (Some(first), Some(last)) = (times.first(), times.last()) else {
            return true;
        };

        jd_to_datetime((first + last) / 2.0)
            .map(|midpoint| self.primary_years.contains(&midpoint.year()))
            .unwrap_or(false)
    }
}

impl<P, F> EphemerisProvider for TieredEphemeris<P, F>
where
    P: EphemerisProvider,
    F: EphemerisProvider,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, pair: ObservationPair) -> bool {
        self.primary.supports(pair) || self.fallback.supports(pair)
    }

    fn ecliptic_longitudes(
        &self,
        pair: ObservationPair,
        times: &[f64],
    ) -> EphemerisResult<Vec<Degrees>> {
        let primary_first = self.prefers_primary(times);
        let first_try = if primary_first {
            self.primary.ecliptic_longitudes(pair, times)
        } else {
            self.fallback.ecliptic_longitudes(pair, times)
        };

        match first_try {
            Err(e) if e.is_body_not_found() => {
                log::debug!("{}: trying the other ephemeris tier", e);
                let second_try = if primary_first {
                    self.fallback.ecliptic_longitudes(pair, times)
                } else {
                    self.primary.ecliptic_longitudes(pair, times)
                };
                second_try.map_err(|e| {
                    log::debug!("{}: other tier failed too: {}", pair, e);
                    EphemerisError::BodyNotFound {
                        provider: self.name.clone(),
                        pair,
                    }
                })
            }
            other => other,
        }
    }

    /// The primary tier answers for its own span, the fallback for the whole run.
    fn tier_years(&self, run_years: RangeInclusive<i32>) -> Vec<(String, RangeInclusive<i32>)> {
        vec![
            (self.primary.name().to_string(), self.primary_years.clone()),
            (self.fallback.name().to_string(), run_years),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::Body;
    use crate::ephemeris::FnEphemeris;
    use crate::time::year_start_jd;

    fn constant(name: &str, value: f64) -> FnEphemeris<impl Fn(ObservationPair, f64) -> Option<f64>> {
        FnEphemeris::new(name, move |pair: ObservationPair, _jd: f64| {
            (pair.observer != Body::Chiron).then_some(value)
        })
    }

    fn tiered() -> TieredEphemeris<
        FnEphemeris<impl Fn(ObservationPair, f64) -> Option<f64>>,
        FnEphemeris<impl Fn(ObservationPair, f64) -> Option<f64>>,
    > {
        TieredEphemeris::new(constant("de440", 1.0), constant("de441", 2.0), 1550..=2650)
    }

    #[test]
    fn test_selects_tier_by_midpoint_year() {
        let pair = ObservationPair::new(Body::Mars, Body::Earth);
        let provider = tiered();

        let inside = [year_start_jd(2000).unwrap(), year_start_jd(2001).unwrap()];
        let outside = [year_start_jd(-500).unwrap(), year_start_jd(-499).unwrap()];

        assert_eq!(provider.ecliptic_longitudes(pair, &inside).unwrap()[0].value(), 1.0);
        assert_eq!(provider.ecliptic_longitudes(pair, &outside).unwrap()[0].value(), 2.0);
        assert_eq!(provider.name(), "de440 / de441");
    }

    #[test]
    fn test_falls_back_when_pair_missing() {
        let chiron_only = FnEphemeris::new("sb441", |pair: ObservationPair, _jd: f64| {
            (pair.observer == Body::Chiron).then_some(3.0)
        });
        let provider = TieredEphemeris::new(constant("de440", 1.0), chiron_only, 1550..=2650);
        let pair = ObservationPair::new(Body::Earth, Body::Chiron);
        let inside = [year_start_jd(2000).unwrap()];

        assert!(provider.supports(pair));
        assert_eq!(provider.ecliptic_longitudes(pair, &inside).unwrap()[0].value(), 3.0);
    }

    #[test]
    fn test_fallback_out_of_range_counts_as_missing() {
        use crate::core::domain::Sample;
        use crate::ephemeris::TableEphemeris;

        let pair = ObservationPair::new(Body::Earth, Body::Chiron);
        let start = year_start_jd(2000).unwrap();
        let chiron_2000 = (0..10).map(|k| Sample::from_degrees(start + k as f64, 5.0)).collect();
        let fallback = TableEphemeris::new("sb441").with_series(pair, chiron_2000);
        let provider = TieredEphemeris::new(constant("de440", 1.0), fallback, 1550..=2650);

        // de440 lacks Chiron and sb441 does not reach 2010
        let later = [year_start_jd(2010).unwrap()];
        let err = provider.ecliptic_longitudes(pair, &later).unwrap_err();
        assert!(err.is_body_not_found(), "unexpected error: {err}");

        let inside = [start, start + 1.0];
        assert_eq!(provider.ecliptic_longitudes(pair, &inside).unwrap()[1].value(), 5.0);
    }

    #[test]
    fn test_tier_years() {
        let provider = tiered();
        assert_eq!(
            provider.tier_years(-100..=3000),
            vec![
                ("de440".to_string(), 1550..=2650),
                ("de441".to_string(), -100..=3000),
            ]
        );
        assert!(constant("single", 0.0).tier_years(0..=1).is_empty());
    }

    #[test]
    fn test_missing_everywhere_names_both_tiers() {
        let provider = tiered();
        let pair = ObservationPair::new(Body::Earth, Body::Chiron);
        let err = provider
            .ecliptic_longitudes(pair, &[year_start_jd(2000).unwrap()])
            .unwrap_err();

        match err {
            EphemerisError::BodyNotFound { provider, .. } => assert_eq!(provider, "de440 / de441"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
