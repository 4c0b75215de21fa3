//! Run configuration file support.
//!
//! A run is described by a TOML file (`retrograde.toml`): the year range, the
//! sampling grid, which bodies to process and in which direction, where the
//! ephemeris tables live and where the report goes. Every section is optional
//! and falls back to the defaults of the classic 1950–2050 Earth-from-bodies run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use qtty::Days;

use crate::core::domain::{Body, ObservationMode};
use crate::error::{Result, RetrogradeError};

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub range: RangeSettings,
    #[serde(default)]
    pub sampling: SamplingSettings,
    #[serde(default)]
    pub bodies: BodySettings,
    #[serde(default)]
    pub ephemeris: EphemerisSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Years covered by the run, `[start_year, end_year)` in whole years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSettings {
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    #[serde(default = "default_end_year")]
    pub end_year: i32,
}

/// Sampling grid settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingSettings {
    /// Years per window requested from the ephemeris at once
    #[serde(default = "default_chunk_years")]
    pub chunk_years: u32,
    #[serde(default = "default_step_days")]
    pub step_days: f64,
}

/// Bodies to process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySettings {
    #[serde(default)]
    pub mode: ObservationMode,
    #[serde(default = "default_body_names")]
    pub names: Vec<String>,
}

/// Ephemeris table locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisSettings {
    #[serde(default)]
    pub tables: Vec<PathBuf>,
    /// Long-span tables used outside the primary year range
    #[serde(default)]
    pub fallback_tables: Vec<PathBuf>,
    #[serde(default = "default_primary_start_year")]
    pub primary_start_year: i32,
    #[serde(default = "default_primary_end_year")]
    pub primary_end_year: i32,
}

/// Report output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    /// Also write a gzip-compressed copy next to `path` (`<path>.gz`)
    #[serde(default)]
    pub compress: bool,
}

fn default_start_year() -> i32 {
    1950
}

fn default_end_year() -> i32 {
    2050
}

fn default_chunk_years() -> u32 {
    10
}

fn default_step_days() -> f64 {
    1.0
}

fn default_body_names() -> Vec<String> {
    Body::DEFAULT_SET.iter().map(|b| b.key().to_string()).collect()
}

fn default_primary_start_year() -> i32 {
    1550
}

fn default_primary_end_year() -> i32 {
    2650
}

fn default_output_path() -> PathBuf {
    PathBuf::from("retrograde_periods.json")
}

fn default_pretty() -> bool {
    true
}

impl Default for RangeSettings {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            end_year: default_end_year(),
        }
    }
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            chunk_years: default_chunk_years(),
            step_days: default_step_days(),
        }
    }
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            mode: ObservationMode::default(),
            names: default_body_names(),
        }
    }
}

impl Default for EphemerisSettings {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            fallback_tables: Vec::new(),
            primary_start_year: default_primary_start_year(),
            primary_end_year: default_primary_end_year(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            pretty: default_pretty(),
            compress: false,
        }
    }
}

impl CalculatorConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RetrogradeError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Parse and validate a configuration from TOML text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: CalculatorConfig = toml::from_str(content).map_err(|e| {
            RetrogradeError::Configuration(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from the default location.
    ///
    /// Searches for `retrograde.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self> {
        let search_paths = [
            PathBuf::from("retrograde.toml"),
            PathBuf::from("rust_backend/retrograde.toml"),
            PathBuf::from("../retrograde.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Using configuration {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(RetrogradeError::Configuration(
            "No retrograde.toml found in standard locations".to_string(),
        ))
    }

    /// Check ranges, sampling and body names.
    pub fn validate(&self) -> Result<()> {
        if self.range.end_year < self.range.start_year {
            return Err(RetrogradeError::Configuration(format!(
                "end_year {} is before start_year {}",
                self.range.end_year, self.range.start_year
            )));
        }

        if self.sampling.chunk_years == 0 {
            return Err(RetrogradeError::Configuration(
                "sampling.chunk_years must be at least 1".to_string(),
            ));
        }

        let step = self.sampling.step_days;
        if !step.is_finite() || step <= 0.0 {
            return Err(RetrogradeError::Configuration(format!(
                "sampling.step_days must be a positive number, got {}",
                step
            )));
        }

        if self.ephemeris.primary_end_year < self.ephemeris.primary_start_year {
            return Err(RetrogradeError::Configuration(
                "ephemeris.primary_end_year is before primary_start_year".to_string(),
            ));
        }

        self.body_list().map(|_| ())
    }

    /// Configured bodies, parsed, in configuration order without duplicates.
    pub fn body_list(&self) -> Result<Vec<Body>> {
        let mut bodies = Vec::with_capacity(self.bodies.names.len());
        for name in &self.bodies.names {
            let body: Body = name
                .parse()
                .map_err(|e| RetrogradeError::Configuration(format!("{}", e)))?;

            if body == Body::Earth {
                return Err(RetrogradeError::Configuration(
                    "Earth is the implicit observer/target and cannot be listed as a body"
                        .to_string(),
                ));
            }
            if !bodies.contains(&body) {
                bodies.push(body);
            }
        }
        Ok(bodies)
    }

    pub fn step(&self) -> Days {
        Days::new(self.sampling.step_days)
    }

    /// Whole years covered by the run.
    pub fn total_years(&self) -> i32 {
        self.range.end_year - self.range.start_year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = CalculatorConfig::from_str("").unwrap();
        assert_eq!(config.range.start_year, 1950);
        assert_eq!(config.range.end_year, 2050);
        assert_eq!(config.sampling.chunk_years, 10);
        assert_eq!(config.sampling.step_days, 1.0);
        assert_eq!(config.bodies.mode, ObservationMode::EarthFromBodies);
        assert_eq!(config.body_list().unwrap(), Body::DEFAULT_SET.to_vec());
        assert_eq!(config.output.path, PathBuf::from("retrograde_periods.json"));
        assert!(config.output.pretty);
        assert!(!config.output.compress);
        assert_eq!(config.total_years(), 100);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[range]
start_year = -500
end_year = 500

[sampling]
chunk_years = 25
step_days = 0.5

[bodies]
mode = "planets_from_earth"
names = ["mars", "Jupiter", "2060", "mars"]

[ephemeris]
tables = ["de440.json"]
fallback_tables = ["de441.json"]

[output]
path = "out/periods.json"
pretty = false
compress = true
"#;

        let config = CalculatorConfig::from_str(toml).unwrap();
        assert_eq!(config.range.start_year, -500);
        assert_eq!(config.sampling.chunk_years, 25);
        assert_eq!(config.step().value(), 0.5);
        assert_eq!(config.bodies.mode, ObservationMode::PlanetsFromEarth);
        assert_eq!(
            config.body_list().unwrap(),
            vec![Body::Mars, Body::Jupiter, Body::Chiron]
        );
        assert_eq!(config.ephemeris.fallback_tables, vec![PathBuf::from("de441.json")]);
        assert_eq!(config.ephemeris.primary_start_year, 1550);
        assert!(!config.output.pretty);
        assert!(config.output.compress);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let toml = "[range]\nstart_year = 2050\nend_year = 1950\n";
        assert!(matches!(
            CalculatorConfig::from_str(toml),
            Err(RetrogradeError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_bad_sampling() {
        assert!(CalculatorConfig::from_str("[sampling]\nchunk_years = 0\n").is_err());
        assert!(CalculatorConfig::from_str("[sampling]\nstep_days = 0.0\n").is_err());
        assert!(CalculatorConfig::from_str("[sampling]\nstep_days = -1.0\n").is_err());
        assert!(CalculatorConfig::from_str("[sampling]\nstep_days = nan\n").is_err());
    }

    #[test]
    fn test_rejects_unknown_and_earth_bodies() {
        assert!(CalculatorConfig::from_str("[bodies]\nnames = [\"vulcan\"]\n").is_err());
        assert!(CalculatorConfig::from_str("[bodies]\nnames = [\"earth\"]\n").is_err());
    }

    #[test]
    fn test_zero_year_range_is_valid() {
        let config =
            CalculatorConfig::from_str("[range]\nstart_year = 2000\nend_year = 2000\n").unwrap();
        assert_eq!(config.total_years(), 0);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[range]\nstart_year = 2020\nend_year = 2030\n").unwrap();

        let config = CalculatorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.range.start_year, 2020);
        assert_eq!(config.total_years(), 10);
    }

    #[test]
    fn test_from_missing_file() {
        let result = CalculatorConfig::from_file("/nonexistent/retrograde.toml");
        assert!(matches!(result, Err(RetrogradeError::Configuration(_))));
    }
}
