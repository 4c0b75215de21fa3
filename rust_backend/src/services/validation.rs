//! Spot checks of computed periods against published reference tables.
//!
//! Each reference period is classified as:
//! - exact: a computed period has the same start and end calendar dates
//! - close: a computed period starts and ends within the tolerance (in days)
//! - missing: nothing computed comes near it
//!
//! Off-by-one-day results are expected: reference tables are usually rounded to
//! the day while samples here sit at 00:00 UTC.

use chrono::NaiveDate;
use log::warn;

use crate::core::domain::RetrogradePeriod;
use crate::parsing::reference_csv::ReferencePeriod;
use crate::time::jd_to_datetime;

/// Default tolerance for a close match, in days
pub const DEFAULT_TOLERANCE_DAYS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Exact,
    Close,
    Missing,
}

impl MatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOutcome::Exact => "exact",
            MatchOutcome::Close => "close",
            MatchOutcome::Missing => "missing",
        }
    }
}

/// Result for one reference period
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodValidation {
    pub reference: ReferencePeriod,
    pub outcome: MatchOutcome,
    pub matched: Option<RetrogradePeriod>,
    /// Computed start minus reference start, in days
    pub start_diff_days: Option<i64>,
    /// Computed end minus reference end, in days
    pub end_diff_days: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub results: Vec<PeriodValidation>,
}

impl ValidationReport {
    pub fn count(&self, outcome: MatchOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn exact_matches(&self) -> usize {
        self.count(MatchOutcome::Exact)
    }

    pub fn close_matches(&self) -> usize {
        self.count(MatchOutcome::Close)
    }

    pub fn missing(&self) -> usize {
        self.count(MatchOutcome::Missing)
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Share of reference periods matched exactly, 0 for an empty reference.
    pub fn exact_match_rate(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            self.exact_matches() as f64 / self.results.len() as f64
        }
    }
}

fn calendar_dates(period: &RetrogradePeriod) -> Option<(NaiveDate, NaiveDate)> {
    let start = jd_to_datetime(period.start_jd)?.date_naive();
    let end = jd_to_datetime(period.end_jd)?.date_naive();
    Some((start, end))
}

/// Classify every reference period against the computed ones.
///
/// Among several close candidates the one with the smallest total day
/// difference wins.
pub fn validate_periods(
    computed: &[RetrogradePeriod],
    reference: &[ReferencePeriod],
    tolerance_days: i64,
) -> ValidationReport {
    let dated: Vec<(RetrogradePeriod, NaiveDate, NaiveDate)> = computed
        .iter()
        .filter_map(|p| calendar_dates(p).map(|(start, end)| (*p, start, end)))
        .collect();

    let results = reference
        .iter()
        .map(|expected| {
            let best = dated
                .iter()
                .map(|(period, start, end)| {
                    let start_diff = (*start - expected.start).num_days();
                    let end_diff = (*end - expected.end).num_days();
                    (period, start_diff, end_diff)
                })
                .filter(|(_, ds, de)| ds.abs() <= tolerance_days && de.abs() <= tolerance_days)
                .min_by_key(|(_, ds, de)| ds.abs() + de.abs());

            match best {
                Some((period, ds, de)) => {
                    let outcome = if ds == 0 && de == 0 {
                        MatchOutcome::Exact
                    } else {
                        warn!(
                            "Close match for {}: start {:+} days, end {:+} days",
                            expected, ds, de
                        );
                        MatchOutcome::Close
                    };
                    PeriodValidation {
                        reference: expected.clone(),
                        outcome,
                        matched: Some(*period),
                        start_diff_days: Some(ds),
                        end_diff_days: Some(de),
                    }
                }
                None => {
                    warn!("No computed period matches {}", expected);
                    PeriodValidation {
                        reference: expected.clone(),
                        outcome: MatchOutcome::Missing,
                        matched: None,
                        start_diff_days: None,
                        end_diff_days: None,
                    }
                }
            }
        })
        .collect();

    ValidationReport { results }
}
