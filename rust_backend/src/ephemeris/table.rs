//! Precomputed longitude tables.
//!
//! A table holds, per observation pair, the longitudes an external ephemeris
//! produced at fixed Julian dates. Lookups are exact: a requested time that is
//! not in the table is an error, never an interpolated value.
//!
//! # File format
//!
//! ```json
//! {
//!   "name": "de421-daily",
//!   "series": [
//!     { "observed": "earth", "observer": "mercury",
//!       "samples": [[2460310.5, 101.25], [2460311.5, 102.5]] }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use qtty::Degrees;
use serde::{Deserialize, Serialize};

use super::{EphemerisError, EphemerisProvider, EphemerisResult};
use crate::core::domain::{Body, ObservationPair, Sample};

/// Two Julian dates closer than this are the same sample (about 0.09 s)
const JD_MATCH_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    name: String,
    series: Vec<SeriesRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SeriesRecord {
    observed: Body,
    observer: Body,
    samples: Vec<(f64, f64)>,
}

/// In-memory longitude tables keyed by observation pair.
#[derive(Debug, Clone, Default)]
pub struct TableEphemeris {
    name: String,
    series: HashMap<ObservationPair, Vec<Sample>>,
}

impl TableEphemeris {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            series: HashMap::new(),
        }
    }

    /// Builder-style variant of [`insert_series`](Self::insert_series).
    pub fn with_series(mut self, pair: ObservationPair, samples: Vec<Sample>) -> Self {
        self.insert_series(pair, samples);
        self
    }

    /// Store the samples for `pair`, replacing any previous series.
    ///
    /// Samples are sorted by time, duplicates dropped and longitudes wrapped
    /// into [0, 360).
    pub fn insert_series(&mut self, pair: ObservationPair, mut samples: Vec<Sample>) {
        samples.sort_by(|a, b| a.jd.total_cmp(&b.jd));
        samples.dedup_by(|a, b| (a.jd - b.jd).abs() <= JD_MATCH_TOLERANCE);
        for sample in &mut samples {
            sample.longitude = Degrees::new(sample.longitude.value().rem_euclid(360.0));
        }
        self.series.insert(pair, samples);
    }

    /// Take over every series of `other`, replacing pairs present in both.
    pub fn merge(&mut self, other: TableEphemeris) {
        self.series.extend(other.series);
    }

    /// Load and merge several table files; the name lists every source.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> EphemerisResult<Self> {
        let mut names = Vec::with_capacity(paths.len());
        let mut merged = TableEphemeris::default();
        for path in paths {
            let table = Self::from_file(path.as_ref())?;
            names.push(table.name.clone());
            merged.merge(table);
        }
        merged.name = names.join("+");
        Ok(merged)
    }

    /// Load tables from a JSON file.
    pub fn from_file(path: &Path) -> EphemerisResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(|e| match e {
            EphemerisError::Parse(msg) => {
                EphemerisError::Parse(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Load tables from a JSON string.
    pub fn from_json_str(json: &str) -> EphemerisResult<Self> {
        let file: TableFile =
            serde_json::from_str(json).map_err(|e| EphemerisError::Parse(e.to_string()))?;

        let mut table = TableEphemeris::new(file.name);
        for record in file.series {
            if record.observed == record.observer {
                return Err(EphemerisError::Parse(format!(
                    "series observes {} from itself",
                    record.observed
                )));
            }
            let samples = record
                .samples
                .into_iter()
                .map(|(jd, longitude)| Sample::from_degrees(jd, longitude))
                .collect();
            table.insert_series(ObservationPair::new(record.observed, record.observer), samples);
        }

        Ok(table)
    }

    /// Pairs present in this table, sorted.
    pub fn pairs(&self) -> Vec<ObservationPair> {
        let mut pairs: Vec<_> = self.series.keys().copied().collect();
        pairs.sort();
        pairs
    }

    /// First and last Julian date stored for `pair`.
    pub fn coverage(&self, pair: ObservationPair) -> Option<(f64, f64)> {
        let samples = self.series.get(&pair)?;
        Some((samples.first()?.jd, samples.last()?.jd))
    }

    pub fn sample_count(&self, pair: ObservationPair) -> usize {
        self.series.get(&pair).map_or(0, Vec::len)
    }
}

impl EphemerisProvider for TableEphemeris {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, pair: ObservationPair) -> bool {
        self.series.contains_key(&pair)
    }

    fn ecliptic_longitudes(
        &self,
        pair: ObservationPair,
        times: &[f64],
    ) -> EphemerisResult<Vec<Degrees>> {
        let samples = self
            .series
            .get(&pair)
            .ok_or_else(|| EphemerisError::BodyNotFound {
                provider: self.name.clone(),
                pair,
            })?;

        if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
            let (lo, hi) = times
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| (lo.min(t), hi.max(t)));
            if lo < first.jd - JD_MATCH_TOLERANCE || hi > last.jd + JD_MATCH_TOLERANCE {
                return Err(EphemerisError::UnsupportedRange {
                    provider: self.name.clone(),
                    start_jd: lo,
                    end_jd: hi,
                });
            }
        }

        let mut longitudes = Vec::with_capacity(times.len());
        // Requested times are usually ascending: resume at the last match, which
        // a repeated time matches again, and restart only when times go back
        let mut cursor = 0;
        for &jd in times {
            if cursor > 0 {
                cursor = if samples[cursor - 1].jd > jd + JD_MATCH_TOLERANCE {
                    0
                } else {
                    cursor - 1
                };
            }
            let offset = samples[cursor..].partition_point(|s| s.jd < jd - JD_MATCH_TOLERANCE);
            let index = cursor + offset;

            match samples.get(index) {
                Some(sample) if (sample.jd - jd).abs() <= JD_MATCH_TOLERANCE => {
                    longitudes.push(sample.longitude);
                    cursor = index + 1;
                }
                _ => {
                    return Err(EphemerisError::MissingSample {
                        provider: self.name.clone(),
                        pair,
                        jd,
                    })
                }
            }
        }

        Ok(longitudes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mercury_pair() -> ObservationPair {
        ObservationPair::new(Body::Earth, Body::Mercury)
    }

    fn table() -> TableEphemeris {
        TableEphemeris::new("test").with_series(
            mercury_pair(),
            vec![
                Sample::from_degrees(2.0, 12.0),
                Sample::from_degrees(0.0, 10.0),
                Sample::from_degrees(1.0, 371.0),
            ],
        )
    }

    #[test]
    fn test_lookup_sorts_and_wraps() {
        let longitudes = table()
            .ecliptic_longitudes(mercury_pair(), &[0.0, 1.0, 2.0])
            .unwrap();
        let values: Vec<f64> = longitudes.iter().map(|d| d.value()).collect();
        assert_eq!(values, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_lookup_out_of_order_times() {
        let longitudes = table()
            .ecliptic_longitudes(mercury_pair(), &[2.0, 0.0])
            .unwrap();
        assert_eq!(longitudes[0].value(), 12.0);
        assert_eq!(longitudes[1].value(), 10.0);
    }

    #[test]
    fn test_lookup_repeated_times() {
        let values = |times: &[f64]| -> Vec<f64> {
            table()
                .ecliptic_longitudes(mercury_pair(), times)
                .unwrap()
                .iter()
                .map(|d| d.value())
                .collect()
        };

        assert_eq!(values(&[1.0, 1.0]), vec![11.0, 11.0]);
        assert_eq!(values(&[1.0, 1.0000005]), vec![11.0, 11.0]);
        assert_eq!(values(&[0.0, 2.0, 2.0, 0.0, 0.0]), vec![10.0, 12.0, 12.0, 10.0, 10.0]);
    }

    #[test]
    fn test_missing_time_is_not_interpolated() {
        let err = table()
            .ecliptic_longitudes(mercury_pair(), &[0.0, 0.5])
            .unwrap_err();
        assert!(matches!(err, EphemerisError::MissingSample { jd, .. } if jd == 0.5));
    }

    #[test]
    fn test_times_outside_coverage() {
        let err = table()
            .ecliptic_longitudes(mercury_pair(), &[1.0, 3.0])
            .unwrap_err();
        assert!(matches!(
            err,
            EphemerisError::UnsupportedRange { start_jd, end_jd, .. } if start_jd == 1.0 && end_jd == 3.0
        ));
    }

    #[test]
    fn test_missing_pair() {
        let pair = ObservationPair::new(Body::Earth, Body::Chiron);
        let err = table().ecliptic_longitudes(pair, &[0.0]).unwrap_err();
        assert!(err.is_body_not_found());
        assert!(!table().supports(pair));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "name": "fixture",
            "series": [
                {
                    "observed": "mars",
                    "observer": "earth",
                    "samples": [[2460310.5, 359.5], [2460311.5, 0.25]]
                }
            ]
        }"#;

        let table = TableEphemeris::from_json_str(json).unwrap();
        let pair = ObservationPair::new(Body::Mars, Body::Earth);
        assert_eq!(table.name(), "fixture");
        assert_eq!(table.pairs(), vec![pair]);
        assert_eq!(table.coverage(pair), Some((2460310.5, 2460311.5)));
        assert_eq!(table.sample_count(pair), 2);
    }

    #[test]
    fn test_from_json_rejects_self_observation() {
        let json = r#"{"name": "bad", "series": [
            {"observed": "earth", "observer": "earth", "samples": []}
        ]}"#;
        assert!(matches!(
            TableEphemeris::from_json_str(json),
            Err(EphemerisError::Parse(_))
        ));
    }

    #[test]
    fn test_merge_keeps_both_series() {
        let mars = ObservationPair::new(Body::Mars, Body::Earth);
        let mut merged = table();
        merged.merge(TableEphemeris::new("other").with_series(mars, vec![Sample::from_degrees(0.0, 1.0)]));

        assert_eq!(merged.pairs(), vec![mercury_pair(), mars]);
        assert_eq!(merged.name(), "test");
    }

    #[test]
    fn test_from_file_missing() {
        let result = TableEphemeris::from_file(Path::new("/nonexistent/table.json"));
        assert!(matches!(result, Err(EphemerisError::Io(_))));
    }
}
