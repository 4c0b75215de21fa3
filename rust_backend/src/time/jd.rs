use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Julian date of the Unix epoch (1970-01-01 00:00:00 UTC)
pub const JD_UNIX_EPOCH: f64 = 2440587.5;

/// Julian date of 0000-12-31 00:00 UTC, the day before `num_days_from_ce() == 1`
const JD_CE_DAY_ZERO: f64 = 1721424.5;

const SECONDS_PER_DAY: f64 = 86400.0;

/// Convert a UTC datetime to a Julian date.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use retrograde_rust::time::datetime_to_jd;
///
/// let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
/// assert_eq!(datetime_to_jd(&j2000), 2451545.0);
/// ```
pub fn datetime_to_jd(datetime: &DateTime<Utc>) -> f64 {
    let seconds = datetime.timestamp() as f64 + datetime.timestamp_subsec_nanos() as f64 * 1e-9;
    JD_UNIX_EPOCH + seconds / SECONDS_PER_DAY
}

/// Convert a Julian date to a UTC datetime.
///
/// Returns `None` for non-finite values or dates outside chrono's range.
pub fn jd_to_datetime(jd: f64) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }

    let seconds = (jd - JD_UNIX_EPOCH) * SECONDS_PER_DAY;
    let mut whole = seconds.floor();
    let mut nanos = ((seconds - whole) * 1e9).round();
    if nanos >= 1e9 {
        whole += 1.0;
        nanos = 0.0;
    }

    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }

    DateTime::from_timestamp(whole as i64, nanos as u32)
}

/// Julian date of midnight UTC at the start of `date` (proleptic Gregorian).
pub fn date_to_jd(date: NaiveDate) -> f64 {
    JD_CE_DAY_ZERO + date.num_days_from_ce() as f64
}

/// Julian date of January 1st, 00:00 UTC of `year`.
///
/// Negative years follow astronomical numbering (year 0 exists).
pub fn year_start_jd(year: i32) -> Option<f64> {
    NaiveDate::from_ymd_opt(year, 1, 1).map(date_to_jd)
}

/// Format the UTC calendar date of a Julian date as `YYYY-MM-DD`.
pub fn jd_to_date_string(jd: f64) -> Option<String> {
    jd_to_datetime(jd).map(|dt| dt.format("%Y-%m-%d").to_string())
}
