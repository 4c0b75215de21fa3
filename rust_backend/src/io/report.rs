use chrono::{SecondsFormat, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::core::domain::{Body, ObservationMode, RetrogradePeriod};
use crate::error::{Result, RetrogradeError};

pub const REPORT_VERSION: &str = "1.0";

/// Run-level information stored alongside the periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// ISO-8601 UTC timestamp of report creation
    pub generated: String,
    pub start_year: i32,
    pub end_year: i32,
    pub total_years: i32,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub mode: ObservationMode,
    #[serde(default)]
    pub ephemeris: String,
    /// Year span answered by each ephemeris tier, keyed by tier name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ephemerides: BTreeMap<String, YearSpan>,
}

/// Inclusive span of years, serialized as `{"start": .., "end": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSpan {
    pub start: i32,
    pub end: i32,
}

impl From<RangeInclusive<i32>> for YearSpan {
    fn from(years: RangeInclusive<i32>) -> Self {
        Self {
            start: *years.start(),
            end: *years.end(),
        }
    }
}

impl ReportMetadata {
    pub fn new(start_year: i32, end_year: i32, mode: ObservationMode, ephemeris: &str) -> Self {
        Self {
            generated: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            start_year,
            end_year,
            total_years: end_year - start_year,
            version: REPORT_VERSION.to_string(),
            description: mode.description().to_string(),
            mode,
            ephemeris: ephemeris.to_string(),
            ephemerides: BTreeMap::new(),
        }
    }

    pub fn with_ephemerides<I>(mut self, tiers: I) -> Self
    where
        I: IntoIterator<Item = (String, RangeInclusive<i32>)>,
    {
        self.ephemerides
            .extend(tiers.into_iter().map(|(name, years)| (name, YearSpan::from(years))));
        self
    }
}

/// One serialized retrograde period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// `YYYY-MM-DD`
    pub start: String,
    /// `YYYY-MM-DD`
    pub end: String,
    pub start_jd: f64,
    pub end_jd: f64,
}

impl PeriodRecord {
    /// Fails only when a Julian date has no calendar representation.
    pub fn from_period(period: &RetrogradePeriod) -> Result<Self> {
        let no_date =
            |jd: f64| RetrogradeError::InvalidSamples(format!("JD {} has no calendar date", jd));

        Ok(Self {
            start: period.start_date().ok_or_else(|| no_date(period.start_jd))?,
            end: period.end_date().ok_or_else(|| no_date(period.end_jd))?,
            start_jd: period.start_jd,
            end_jd: period.end_jd,
        })
    }

    pub fn to_period(&self) -> RetrogradePeriod {
        RetrogradePeriod {
            start_jd: self.start_jd,
            end_jd: self.end_jd,
        }
    }
}

/// All periods found for one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRetrogrades {
    pub periods: Vec<PeriodRecord>,
    pub count: usize,
    pub average_per_year: f64,
}

impl BodyRetrogrades {
    pub fn new(periods: &[RetrogradePeriod], total_years: i32) -> Result<Self> {
        let periods = periods
            .iter()
            .map(PeriodRecord::from_period)
            .collect::<Result<Vec<_>>>()?;
        let count = periods.len();

        Ok(Self {
            periods,
            count,
            average_per_year: average_per_year(count, total_years),
        })
    }

    /// Entry for a body that produced no periods.
    pub fn empty() -> Self {
        Self {
            periods: Vec::new(),
            count: 0,
            average_per_year: 0.0,
        }
    }
}

/// Periods per year; 0 when there are no periods or the range is empty.
///
/// ```
/// use retrograde_rust::io::report::average_per_year;
///
/// assert_eq!(average_per_year(325, 100), 3.25);
/// assert_eq!(average_per_year(0, 100), 0.0);
/// assert_eq!(average_per_year(4, 0), 0.0);
/// ```
pub fn average_per_year(count: usize, total_years: i32) -> f64 {
    if count == 0 || total_years <= 0 {
        0.0
    } else {
        count as f64 / f64::from(total_years)
    }
}

/// Serialized result of a full run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrogradeReport {
    pub metadata: ReportMetadata,
    /// Keyed by body key (`"mercury"`), sorted
    pub planets: BTreeMap<String, BodyRetrogrades>,
}

impl RetrogradeReport {
    pub fn new(metadata: ReportMetadata) -> Self {
        Self {
            metadata,
            planets: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, body: Body, entry: BodyRetrogrades) {
        self.planets.insert(body.key().to_string(), entry);
    }

    pub fn get(&self, body: Body) -> Option<&BodyRetrogrades> {
        self.planets.get(body.key())
    }

    /// Periods of `body` as domain values, empty when the body is absent.
    pub fn periods_for(&self, body: Body) -> Vec<RetrogradePeriod> {
        self.get(body)
            .map(|entry| entry.periods.iter().map(PeriodRecord::to_period).collect())
            .unwrap_or_default()
    }

    pub fn total_periods(&self) -> usize {
        self.planets.values().map(|entry| entry.count).sum()
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write the report as plain JSON, creating parent directories as needed.
    /// Returns the file size in bytes.
    pub fn write_json(&self, path: &Path, pretty: bool) -> Result<u64> {
        create_parent_dir(path)?;
        fs::write(path, self.to_json_string(pretty)?)?;
        Ok(fs::metadata(path)?.len())
    }

    /// Write the report as gzip-compressed JSON. Returns the file size in bytes.
    pub fn write_json_gz(&self, path: &Path, pretty: bool) -> Result<u64> {
        create_parent_dir(path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(File::create(path)?), Compression::default());
        if pretty {
            serde_json::to_writer_pretty(&mut encoder, self)?;
        } else {
            serde_json::to_writer(&mut encoder, self)?;
        }
        encoder.finish()?.flush()?;
        Ok(fs::metadata(path)?.len())
    }

    /// Write the report to `path`, plus a gzip copy when `compress` is set.
    ///
    /// A `path` ending in `.gz` is always compressed; the plain copy then goes
    /// to the same path without the suffix.
    pub fn save(&self, path: &Path, pretty: bool, compress: bool) -> Result<SavedReport> {
        let (json_path, gzip_path) = output_paths(path);
        let json_bytes = self.write_json(&json_path, pretty)?;

        let gzip = if compress || is_gzip_path(path) {
            let bytes = self.write_json_gz(&gzip_path, pretty)?;
            Some((gzip_path, bytes))
        } else {
            None
        };

        Ok(SavedReport {
            json_path,
            json_bytes,
            gzip,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a report written by [`save`](Self::save); `.gz` files are decompressed.
    pub fn from_file(path: &Path) -> Result<Self> {
        if is_gzip_path(path) {
            let decoder = GzDecoder::new(BufReader::new(File::open(path)?));
            return Ok(serde_json::from_reader(decoder)?);
        }

        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Human-readable run summary, one line per entry.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total retrograde periods: {}", self.total_periods()),
            format!("Years covered: {}", self.metadata.total_years),
            format!("Retrograde periods per body ({}):", self.metadata.description),
        ];

        for (key, entry) in &self.planets {
            let name = key
                .parse::<Body>()
                .map(|body| body.display_name().to_string())
                .unwrap_or_else(|_| key.clone());
            lines.push(format!(
                "  {}: {} (~{:.2} per year)",
                name, entry.count, entry.average_per_year
            ));
        }

        lines
    }
}

/// Files written by [`RetrogradeReport::save`].
#[derive(Debug, Clone, PartialEq)]
pub struct SavedReport {
    pub json_path: PathBuf,
    pub json_bytes: u64,
    pub gzip: Option<(PathBuf, u64)>,
}

impl SavedReport {
    /// Uncompressed over compressed size, when a gzip copy was written.
    pub fn compression_ratio(&self) -> Option<f64> {
        self.gzip
            .as_ref()
            .filter(|(_, bytes)| *bytes > 0)
            .map(|(_, bytes)| self.json_bytes as f64 / *bytes as f64)
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let megabytes = |bytes: u64| bytes as f64 / (1024.0 * 1024.0);
        let mut lines = vec![format!(
            "Results saved to: {} ({:.2} MB)",
            self.json_path.display(),
            megabytes(self.json_bytes)
        )];

        if let Some((path, bytes)) = &self.gzip {
            lines.push(format!(
                "Compressed copy: {} ({:.2} MB)",
                path.display(),
                megabytes(*bytes)
            ));
        }
        if let Some(ratio) = self.compression_ratio() {
            lines.push(format!("Compression ratio: {:.1}x", ratio));
        }

        lines
    }
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Plain and gzip paths for an output path given with or without `.gz`.
fn output_paths(path: &Path) -> (PathBuf, PathBuf) {
    if is_gzip_path(path) {
        (path.with_extension(""), path.to_path_buf())
    } else {
        let mut gzip = path.as_os_str().to_os_string();
        gzip.push(".gz");
        (path.to_path_buf(), PathBuf::from(gzip))
    }
}
