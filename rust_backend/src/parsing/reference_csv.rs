use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::fmt;
use std::path::Path;

pub const START_COLUMN: &str = "Start Date";
pub const END_COLUMN: &str = "End Date";

/// Date format of reference tables, e.g. `14-Jan-2024`
pub const REFERENCE_DATE_FORMAT: &str = "%d-%b-%Y";

/// One published retrograde period, day resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for ReferencePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Parse a `14-Jan-2024` style date.
pub fn parse_reference_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), REFERENCE_DATE_FORMAT).ok()
}

/// Load a reference CSV with `Start Date` / `End Date` columns.
pub fn parse_reference_csv(csv_path: &Path) -> Result<Vec<ReferencePeriod>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV {}", csv_path.display()))?;

    dataframe_to_reference_periods(&df)
}

/// Convert a DataFrame with the reference columns into periods.
pub fn dataframe_to_reference_periods(df: &DataFrame) -> Result<Vec<ReferencePeriod>> {
    let starts = df
        .column(START_COLUMN)
        .with_context(|| format!("Missing '{}' column", START_COLUMN))?
        .cast(&DataType::String)?;
    let ends = df
        .column(END_COLUMN)
        .with_context(|| format!("Missing '{}' column", END_COLUMN))?
        .cast(&DataType::String)?;
    let starts = starts.str()?;
    let ends = ends.str()?;

    let mut periods = Vec::with_capacity(df.height());
    for (row, (start, end)) in starts.into_iter().zip(ends.into_iter()).enumerate() {
        let date = |value: Option<&str>, column: &str| {
            let value = value.ok_or_else(|| anyhow!("Row {}: empty '{}'", row + 1, column))?;
            parse_reference_date(value)
                .ok_or_else(|| anyhow!("Row {}: invalid date '{}' in '{}'", row + 1, value, column))
        };

        let start = date(start, START_COLUMN)?;
        let end = date(end, END_COLUMN)?;
        if end < start {
            return Err(anyhow!("Row {}: end {} is before start {}", row + 1, end, start));
        }
        periods.push(ReferencePeriod { start, end });
    }

    Ok(periods)
}
