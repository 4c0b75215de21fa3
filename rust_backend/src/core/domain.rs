//! Domain models for bodies, longitude samples and retrograde periods.
//!
//! This module provides the core data structures that flow through the extractor:
//! a [`Sample`] is one ecliptic longitude reading, a [`RetrogradePeriod`] is one
//! interval of apparent backwards motion, and an [`ObservationPair`] names which
//! body is watched from where.

use std::fmt;
use std::str::FromStr;

use qtty::{Days, Degrees};
use serde::{Deserialize, Serialize};

use crate::time::jd_to_date_string;

/// Solar-system bodies known to the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
}

/// How a body is addressed inside an ephemeris file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EphemerisTarget {
    /// Named segment, e.g. `MARS BARYCENTER`
    Name(&'static str),
    /// Small-body number, e.g. `2060` for Chiron
    Number(u32),
}

impl fmt::Display for EphemerisTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemerisTarget::Name(name) => write!(f, "{}", name),
            EphemerisTarget::Number(number) => write!(f, "{}", number),
        }
    }
}

impl Body {
    pub const ALL: [Body; 12] = [
        Body::Sun,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Moon,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::Chiron,
    ];

    /// Bodies processed when no explicit list is configured.
    pub const DEFAULT_SET: [Body; 9] = [
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::Chiron,
    ];

    /// Lowercase key used in reports and configuration files.
    pub fn key(&self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Earth => "earth",
            Body::Moon => "moon",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
            Body::Chiron => "chiron",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Moon => "Moon",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::Chiron => "Chiron",
        }
    }

    /// Segment name (or small-body number) of this body in JPL ephemerides.
    pub fn ephemeris_target(&self) -> EphemerisTarget {
        match self {
            Body::Sun => EphemerisTarget::Name("SUN"),
            Body::Mercury => EphemerisTarget::Name("MERCURY BARYCENTER"),
            Body::Venus => EphemerisTarget::Name("VENUS BARYCENTER"),
            Body::Earth => EphemerisTarget::Name("EARTH"),
            Body::Moon => EphemerisTarget::Name("MOON"),
            Body::Mars => EphemerisTarget::Name("MARS BARYCENTER"),
            Body::Jupiter => EphemerisTarget::Name("JUPITER BARYCENTER"),
            Body::Saturn => EphemerisTarget::Name("SATURN BARYCENTER"),
            Body::Uranus => EphemerisTarget::Name("URANUS BARYCENTER"),
            Body::Neptune => EphemerisTarget::Name("NEPTUNE BARYCENTER"),
            Body::Pluto => EphemerisTarget::Name("PLUTO BARYCENTER"),
            Body::Chiron => EphemerisTarget::Number(2060),
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a body name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown body: {0}")]
pub struct ParseBodyError(pub String);

impl FromStr for Body {
    type Err = ParseBodyError;

    /// Accepts report keys (`mars`), display names and ephemeris labels
    /// (`MARS BARYCENTER`, `2060`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let wanted = wanted.trim_end_matches(" barycenter");

        Body::ALL
            .iter()
            .copied()
            .find(|body| {
                body.key() == wanted || body.ephemeris_target().to_string().to_lowercase() == wanted
            })
            .ok_or_else(|| ParseBodyError(s.to_string()))
    }
}

/// Which body is watched (`observed`) from which body (`observer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObservationPair {
    pub observed: Body,
    pub observer: Body,
}

impl ObservationPair {
    pub fn new(observed: Body, observer: Body) -> Self {
        Self { observed, observer }
    }
}

impl fmt::Display for ObservationPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {}", self.observed, self.observer)
    }
}

/// Direction of observation for a whole run.
///
/// The report is keyed by the configured body in both modes; Earth is the
/// implicit second member of every pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationMode {
    /// Each configured body as seen from Earth (classic planetary retrogrades)
    PlanetsFromEarth,
    /// Earth as seen from each configured body
    #[default]
    EarthFromBodies,
}

impl ObservationMode {
    pub fn pair_for(&self, body: Body) -> ObservationPair {
        match self {
            ObservationMode::PlanetsFromEarth => ObservationPair::new(body, Body::Earth),
            ObservationMode::EarthFromBodies => ObservationPair::new(Body::Earth, body),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ObservationMode::PlanetsFromEarth => {
                "Planetary retrograde periods as observed from Earth"
            }
            ObservationMode::EarthFromBodies => {
                "Earth retrograde periods as observed from other celestial bodies"
            }
        }
    }
}

/// One ecliptic longitude reading.
///
/// `jd` is a Julian date; `longitude` is nominally in [0, 360) degrees and may
/// wrap between consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub jd: f64,
    pub longitude: Degrees,
}

impl Sample {
    pub fn new(jd: f64, longitude: Degrees) -> Self {
        Self { jd, longitude }
    }

    /// Shorthand for raw degree values.
    pub fn from_degrees(jd: f64, longitude: f64) -> Self {
        Self::new(jd, Degrees::new(longitude))
    }
}

/// An interval of apparent retrograde motion.
///
/// `start_jd` is the sample where the longitude starts decreasing and `end_jd`
/// the first sample where it increases again, so the interval is open at the end.
///
/// # Examples
///
/// ```
/// use retrograde_rust::core::domain::RetrogradePeriod;
///
/// let period = RetrogradePeriod::new(2460000.5, 2460021.5);
/// assert_eq!(period.duration().value(), 21.0);
/// assert_eq!(period.start_date().as_deref(), Some("2023-02-25"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrogradePeriod {
    pub start_jd: f64,
    pub end_jd: f64,
}

impl RetrogradePeriod {
    pub fn new(start_jd: f64, end_jd: f64) -> Self {
        debug_assert!(start_jd < end_jd, "retrograde period must have positive length");
        Self { start_jd, end_jd }
    }

    /// Returns the duration as a strongly-typed `Days` quantity.
    pub fn duration(&self) -> Days {
        Days::new(self.end_jd - self.start_jd)
    }

    /// Calendar date (`YYYY-MM-DD`, UTC) of the first retrograde sample.
    pub fn start_date(&self) -> Option<String> {
        jd_to_date_string(self.start_jd)
    }

    /// Calendar date (`YYYY-MM-DD`, UTC) of the sample where motion resumes prograde.
    pub fn end_date(&self) -> Option<String> {
        jd_to_date_string(self.end_jd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_keys_round_trip_through_from_str() {
        for body in Body::ALL {
            assert_eq!(body.key().parse::<Body>().unwrap(), body);
        }
    }

    #[test]
    fn test_body_from_ephemeris_labels() {
        assert_eq!("MARS BARYCENTER".parse::<Body>().unwrap(), Body::Mars);
        assert_eq!("Jupiter".parse::<Body>().unwrap(), Body::Jupiter);
        assert_eq!("2060".parse::<Body>().unwrap(), Body::Chiron);
        assert!("vulcan".parse::<Body>().is_err());
    }

    #[test]
    fn test_ephemeris_target_display() {
        assert_eq!(Body::Venus.ephemeris_target().to_string(), "VENUS BARYCENTER");
        assert_eq!(Body::Chiron.ephemeris_target().to_string(), "2060");
    }

    #[test]
    fn test_mode_pairs() {
        let pair = ObservationMode::EarthFromBodies.pair_for(Body::Mercury);
        assert_eq!(pair.observed, Body::Earth);
        assert_eq!(pair.observer, Body::Mercury);

        let pair = ObservationMode::PlanetsFromEarth.pair_for(Body::Mars);
        assert_eq!(pair.observed, Body::Mars);
        assert_eq!(pair.observer, Body::Earth);
        assert_eq!(pair.to_string(), "Mars from Earth");
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&ObservationMode::PlanetsFromEarth).unwrap();
        assert_eq!(json, "\"planets_from_earth\"");
        let mode: ObservationMode = serde_json::from_str("\"earth_from_bodies\"").unwrap();
        assert_eq!(mode, ObservationMode::EarthFromBodies);
    }

    #[test]
    fn test_period_dates_and_duration() {
        let period = RetrogradePeriod::new(2460310.5, 2460314.5);
        assert_eq!(period.duration().value(), 4.0);
        assert_eq!(period.start_date().unwrap(), "2024-01-01");
        assert_eq!(period.end_date().unwrap(), "2024-01-05");
    }
}
