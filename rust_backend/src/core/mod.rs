//! Core domain models for retrograde computations.
//!
//! This module defines the fundamental data structures used throughout the crate,
//! representing solar-system bodies, observation pairs, longitude samples and
//! retrograde periods.

pub mod domain;

pub use domain::{Body, ObservationMode, ObservationPair, RetrogradePeriod, Sample};
