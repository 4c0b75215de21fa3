//! Retrograde period extraction from ecliptic longitude series.
//!
//! A body is in apparent retrograde motion while its ecliptic longitude, as seen
//! from the observer, decreases. Consecutive longitudes are differenced, the
//! difference is folded back into [-180, 180] so a crossing of 0°/360° reads as
//! a small step, and every maximal run of negative steps becomes one
//! [`RetrogradePeriod`].
//!
//! ## Windowed processing
//! [`RetrogradeExtractor`] is a streaming scanner: it keeps the last sample it
//! saw and any run still open, so a long range can be fed window by window with
//! zero overlap and produce exactly what a single pass over the whole series
//! produces. A run still open after the last window is closed at the last
//! sample by [`RetrogradeExtractor::finish`].

use qtty::Degrees;

use crate::core::domain::{RetrogradePeriod, Sample};

const FULL_TURN: f64 = 360.0;
const HALF_TURN: f64 = 180.0;

/// Fold a raw longitude difference across the 0°/360° seam.
///
/// Values above 180 lose a full turn, values below -180 gain one; exactly ±180
/// is left untouched.
///
/// ```
/// use retrograde_rust::algorithms::retrograde::normalize_delta;
///
/// assert_eq!(normalize_delta(2.0 - 355.0), 7.0);
/// assert_eq!(normalize_delta(355.0 - 2.0), -7.0);
/// assert_eq!(normalize_delta(-1.5), -1.5);
/// ```
#[inline]
pub fn normalize_delta(delta: f64) -> f64 {
    if delta > HALF_TURN {
        delta - FULL_TURN
    } else if delta < -HALF_TURN {
        delta + FULL_TURN
    } else {
        delta
    }
}

/// Whether the step from `from` to `to` is retrograde (strictly decreasing).
#[inline]
pub fn is_retrograde_step(from: Degrees, to: Degrees) -> bool {
    normalize_delta(to.value() - from.value()) < 0.0
}

/// Per-step retrograde classification of a longitude series.
///
/// Entry `i` describes the step from sample `i` to sample `i + 1`, so the result
/// is one shorter than the input (empty below two samples).
pub fn retrograde_flags(longitudes: &[Degrees]) -> Vec<bool> {
    longitudes
        .windows(2)
        .map(|pair| is_retrograde_step(pair[0], pair[1]))
        .collect()
}

/// Streaming retrograde scanner with carry-over between windows.
///
/// # Example
/// ```
/// use retrograde_rust::algorithms::retrograde::RetrogradeExtractor;
/// use retrograde_rust::core::domain::Sample;
///
/// let first: Vec<Sample> = [(0.0, 10.0), (1.0, 12.0), (2.0, 11.0)]
///     .iter()
///     .map(|&(jd, lon)| Sample::from_degrees(jd, lon))
///     .collect();
/// let second: Vec<Sample> = [(3.0, 9.0), (4.0, 8.0), (5.0, 10.0)]
///     .iter()
///     .map(|&(jd, lon)| Sample::from_degrees(jd, lon))
///     .collect();
///
/// let mut extractor = RetrogradeExtractor::new();
/// assert!(extractor.push_window(&first).is_empty());
/// assert!(extractor.is_open());
///
/// let periods = extractor.push_window(&second);
/// assert_eq!(periods.len(), 1);
/// assert_eq!((periods[0].start_jd, periods[0].end_jd), (1.0, 4.0));
/// assert!(extractor.finish().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RetrogradeExtractor {
    previous: Option<Sample>,
    open_run_start: Option<f64>,
}

impl RetrogradeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next sample; returns a period when this sample ends a run.
    ///
    /// Samples must arrive in strictly increasing `jd` order.
    pub fn push(&mut self, sample: Sample) -> Option<RetrogradePeriod> {
        let previous = self.previous.replace(sample)?;
        debug_assert!(
            sample.jd > previous.jd,
            "samples must be strictly increasing in time"
        );

        let retrograde = is_retrograde_step(previous.longitude, sample.longitude);
        match (retrograde, self.open_run_start) {
            (true, None) => {
                self.open_run_start = Some(previous.jd);
                None
            }
            (false, Some(start_jd)) => {
                self.open_run_start = None;
                Some(RetrogradePeriod::new(start_jd, previous.jd))
            }
            _ => None,
        }
    }

    /// Feed a whole window; returns the periods completed inside it.
    ///
    /// The first sample of `window` is differenced against the last sample of
    /// the previous window, so windows must not overlap.
    pub fn push_window(&mut self, window: &[Sample]) -> Vec<RetrogradePeriod> {
        window.iter().filter_map(|sample| self.push(*sample)).collect()
    }

    /// Whether a retrograde run is in progress.
    pub fn is_open(&self) -> bool {
        self.open_run_start.is_some()
    }

    /// Julian date of the first sample of the run in progress, if any.
    pub fn open_run_start(&self) -> Option<f64> {
        self.open_run_start
    }

    /// Julian date of the last sample fed in.
    pub fn last_jd(&self) -> Option<f64> {
        self.previous.map(|sample| sample.jd)
    }

    /// End of the series: close a run still in progress at the last sample.
    pub fn finish(self) -> Option<RetrogradePeriod> {
        match (self.open_run_start, self.previous) {
            (Some(start_jd), Some(last)) => Some(RetrogradePeriod::new(start_jd, last.jd)),
            _ => None,
        }
    }
}

/// Single-pass extraction over a complete series.
///
/// A run still open at the end is closed at the last sample.
pub fn extract_retrograde_periods(samples: &[Sample]) -> Vec<RetrogradePeriod> {
    let mut extractor = RetrogradeExtractor::new();
    let mut periods = extractor.push_window(samples);
    periods.extend(extractor.finish());
    periods
}
