//! Cutoff computation and Gmail query construction
//!
//! A cutoff is a timezone-aware instant; everything strictly before it
//! is targeted for deletion. The query encodes that instant as an
//! epoch timestamp (`before:1704067200`), never as a calendar date
//! string - `before:2024/01/01` means midnight in an unspecified
//! timezone and silently shifts the boundary by up to a day.

use chrono::{DateTime, Local, Months, NaiveDate, TimeZone};

use crate::error::{GmailError, Result};

/// The instant exactly `months` calendar months before now, in the
/// local timezone.
///
/// Calendar arithmetic, not a 30-day approximation: one month before
/// March 31 is the last day of February.
pub fn months_ago_to_cutoff(months: u32) -> Result<DateTime<Local>> {
    Local::now()
        .checked_sub_months(Months::new(months))
        .ok_or_else(|| {
            GmailError::ValidationError(format!("month offset {} is out of range", months))
        })
}

/// Parse a `YYYY-MM-DD` string into a cutoff at the end of that day
/// (23:59:59) in the local timezone, so the entire named day falls
/// before the cutoff.
pub fn parse_date_to_cutoff(date_str: &str) -> Result<DateTime<Local>> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
        GmailError::ValidationError(format!("invalid date '{}' (expected YYYY-MM-DD): {}", date_str, e))
    })?;

    let end_of_day = date.and_hms_opt(23, 59, 59).ok_or_else(|| {
        GmailError::ValidationError(format!("invalid date '{}'", date_str))
    })?;

    end_of_day
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| {
            GmailError::ValidationError(format!(
                "date '{}' does not exist in the local timezone",
                date_str
            ))
        })
}

/// Convert a cutoff instant into a Gmail search query string.
///
/// Uses `before:{epoch}` with an integral Unix timestamp. The same
/// instant yields the same query regardless of the caller's timezone.
pub fn build_query<Tz: TimeZone>(cutoff: &DateTime<Tz>) -> String {
    format!("before:{}", cutoff.timestamp())
}
