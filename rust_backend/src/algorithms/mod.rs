//! Retrograde detection algorithms.
//!
//! # Components
//!
//! - [`retrograde`]: delta normalization, step classification and the streaming
//!   [`RetrogradeExtractor`]
//!
//! # Example
//!
//! ```
//! use retrograde_rust::algorithms::extract_retrograde_periods;
//! use retrograde_rust::core::domain::Sample;
//!
//! let samples: Vec<Sample> = [10.0, 12.0, 11.0, 9.0, 8.0, 10.0, 13.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &lon)| Sample::from_degrees(i as f64, lon))
//!     .collect();
//!
//! let periods = extract_retrograde_periods(&samples);
//! assert_eq!(periods.len(), 1);
//! assert_eq!((periods[0].start_jd, periods[0].end_jd), (1.0, 4.0));
//! ```

pub mod retrograde;


pub use retrograde::{
    extract_retrograde_periods, is_retrograde_step, normalize_delta, retrograde_flags,
    RetrogradeExtractor,
};
