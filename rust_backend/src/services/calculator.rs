//! Chunked retrograde calculation over a year range.
//!
//! The requested range is sampled on a regular grid starting at January 1st of
//! the first year. The grid is cut at every `chunk_years` year boundary into
//! windows that never share a sample; each window is fetched from the
//! ephemeris, checked, and streamed through a single [`RetrogradeExtractor`]
//! per pair so runs crossing a window boundary come out whole.
//!
//! A window the ephemeris does not carry the pair for is skipped: the run open
//! before the gap is closed at the last sample seen and scanning resumes after
//! it. A pair missing from every window is reported as not found.

use log::{debug, info, warn};

use crate::algorithms::RetrogradeExtractor;
use crate::config::CalculatorConfig;
use crate::core::domain::{Body, ObservationPair, RetrogradePeriod, Sample};
use crate::ephemeris::EphemerisProvider;
use crate::error::{Result, RetrogradeError};
use crate::io::report::{BodyRetrogrades, ReportMetadata, RetrogradeReport};
use crate::time::SampleGrid;

/// Drives extraction for every configured body against one provider.
pub struct RetrogradeCalculator<'a, P: EphemerisProvider + ?Sized> {
    config: &'a CalculatorConfig,
    provider: &'a P,
    bodies: Vec<Body>,
}

impl<'a, P: EphemerisProvider + ?Sized> RetrogradeCalculator<'a, P> {
    /// Validates the configuration up front.
    pub fn new(config: &'a CalculatorConfig, provider: &'a P) -> Result<Self> {
        config.validate()?;
        let bodies = config.body_list()?;
        Ok(Self {
            config,
            provider,
            bodies,
        })
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Observation pairs for the configured bodies and mode.
    pub fn pairs(&self) -> Vec<ObservationPair> {
        self.bodies
            .iter()
            .map(|&body| self.config.bodies.mode.pair_for(body))
            .collect()
    }

    /// Sampling grid for the configured range, windowed every `chunk_years`.
    pub fn grid(&self) -> Result<SampleGrid> {
        let range = &self.config.range;
        SampleGrid::yearly(
            range.start_year,
            range.end_year,
            self.config.step().value(),
            self.config.sampling.chunk_years,
        )
        .ok_or_else(|| {
            RetrogradeError::Configuration(format!(
                "Years {}..{} are out of range",
                range.start_year, range.end_year
            ))
        })
    }

    /// Retrograde periods of `pair` over the configured range.
    pub fn find_periods(&self, pair: ObservationPair) -> Result<Vec<RetrogradePeriod>> {
        let grid = self.grid()?;
        if grid.is_empty() {
            return Ok(Vec::new());
        }

        let mut extractor = RetrogradeExtractor::new();
        let mut periods = Vec::new();
        let mut covered = 0;
        let mut skipped = 0;
        let mut not_found = None;
        debug!("{}: {} samples in {} windows", pair, grid.len(), grid.windows().len());

        for window in grid.windows() {
            let times = grid.times(window.clone());
            let (Some(first), Some(last)) = (times.first(), times.last()) else {
                continue;
            };
            debug!("{}: window JD {}..={} ({} samples)", pair, first, last, times.len());

            let longitudes = match self.provider.ecliptic_longitudes(pair, &times) {
                Ok(longitudes) => longitudes,
                Err(e) if e.is_body_not_found() => {
                    debug!("{}: skipping window: {}", pair, e);
                    periods.extend(std::mem::take(&mut extractor).finish());
                    skipped += 1;
                    not_found = Some(e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let samples = checked_samples(&times, &longitudes, extractor.last_jd())?;
            periods.extend(extractor.push_window(&samples));
            covered += 1;
        }

        if let (0, Some(e)) = (covered, not_found) {
            return Err(e.into());
        }
        if skipped > 0 {
            warn!(
                "{}: {} of {} windows not covered by '{}'",
                pair,
                skipped,
                skipped + covered,
                self.provider.name()
            );
        }

        periods.extend(extractor.finish());
        Ok(periods)
    }

    /// Run every configured body and assemble the report.
    ///
    /// A body the ephemeris does not carry is reported with no periods; every
    /// other failure aborts the run.
    pub fn calculate_all(&self) -> Result<RetrogradeReport> {
        let range = &self.config.range;
        let metadata = ReportMetadata::new(
            range.start_year,
            range.end_year,
            self.config.bodies.mode,
            self.provider.name(),
        )
        .with_ephemerides(self.provider.tier_years(range.start_year..=range.end_year));
        let total_years = metadata.total_years;
        let mut report = RetrogradeReport::new(metadata);

        info!(
            "Calculating retrograde periods {}-{} for {} bodies using '{}'",
            range.start_year,
            range.end_year,
            self.bodies.len(),
            self.provider.name()
        );

        for &body in &self.bodies {
            let pair = self.config.bodies.mode.pair_for(body);
            info!("Processing {}", pair);

            let entry = match self.find_periods(pair) {
                Ok(periods) => {
                    info!("  {}: {} retrograde periods found", body, periods.len());
                    BodyRetrogrades::new(&periods, total_years)?
                }
                Err(e) if e.is_body_not_found() => {
                    warn!("Skipping {}: {}", body, e);
                    BodyRetrogrades::empty()
                }
                Err(e) => return Err(e),
            };
            report.insert(body, entry);
        }

        Ok(report)
    }
}

/// Wrap into [0, 360); `rem_euclid` rounds tiny negatives up to 360 itself.
fn wrap_longitude(value: f64) -> f64 {
    let wrapped = value.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Pair provider output with its times, rejecting anything the extractor
/// cannot scan: a length mismatch, non-finite values or times that do not
/// strictly increase (also across the previous window's last sample).
/// Longitudes are wrapped into [0, 360).
pub fn checked_samples(
    times: &[f64],
    longitudes: &[qtty::Degrees],
    previous_jd: Option<f64>,
) -> Result<Vec<Sample>> {
    if times.len() != longitudes.len() {
        return Err(RetrogradeError::InvalidSamples(format!(
            "Provider returned {} longitudes for {} times",
            longitudes.len(),
            times.len()
        )));
    }

    let mut last = previous_jd;
    let mut samples = Vec::with_capacity(times.len());
    for (&jd, longitude) in times.iter().zip(longitudes) {
        let value = longitude.value();
        if !jd.is_finite() || !value.is_finite() {
            return Err(RetrogradeError::InvalidSamples(format!(
                "Non-finite sample (JD {}, longitude {})",
                jd, value
            )));
        }
        if let Some(last_jd) = last {
            if jd <= last_jd {
                return Err(RetrogradeError::InvalidSamples(format!(
                    "Sample times not increasing: JD {} after JD {}",
                    jd, last_jd
                )));
            }
        }
        last = Some(jd);
        samples.push(Sample::from_degrees(jd, wrap_longitude(value)));
    }

    Ok(samples)
}
