// src/filter.rs
//! Date filtering on certificate not_before

use crate::types::CertificateRecord;
use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const TIMESTAMP_FRACTION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a crt.sh `not_before` value (`YYYY-MM-DDTHH:MM:SS`)
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, TIMESTAMP_FRACTION_FORMAT))
}

/// Inclusive calendar date range given as `start-date:end-date`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    /// Parse `YYYY-MM-DD:YYYY-MM-DD`
    pub fn parse(value: &str) -> Result<Self> {
        let (start, end) = value.trim().split_once(':').with_context(|| {
            format!(
                "start date not provided in valid format: '{}' (expected YYYY-MM-DD:YYYY-MM-DD)",
                value
            )
        })?;

        if start.trim().is_empty() {
            anyhow::bail!("start date not provided in valid format: '{}'", value);
        }
        if end.trim().is_empty() {
            anyhow::bail!("end date not provided in valid format: '{}'", value);
        }

        let start_date = NaiveDate::parse_from_str(start.trim(), DATE_FORMAT)
            .with_context(|| format!("Error parsing start date '{}'", start))?;
        let end_date = NaiveDate::parse_from_str(end.trim(), DATE_FORMAT)
            .with_context(|| format!("Error parsing end date '{}'", end))?;

        if start_date > end_date {
            tracing::warn!(
                "Start date {} is after end date {}; no certificates can match",
                start_date,
                end_date
            );
        }

        Ok(Self::new(start_date, end_date))
    }

    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        // End of day so the end date itself is included
        let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);

        Self {
            start: start.and_time(NaiveTime::MIN),
            end: end.and_time(last_second),
        }
    }

    /// Strictly after the start instant, up to and including 23:59:59 of the end date
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant > self.start && instant <= self.end
    }
}

/// Which certificates survive by their not_before date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// Only certificates issued inside the range
    Between(DateRange),
    /// Only certificates issued within the last N days (N > 0)
    WithinDays(u32),
    /// No filtering
    All,
}

impl DateFilter {
    /// Select the filter mode. A range takes precedence over a day count,
    /// and a day count of zero disables filtering.
    pub fn from_args(between: Option<&str>, days: Option<u32>) -> Result<Self> {
        if let Some(range) = between.filter(|b| !b.is_empty()) {
            if days.is_some() {
                tracing::warn!("Both --between and --days given; using --between");
            }
            return Ok(DateFilter::Between(DateRange::parse(range)?));
        }

        match days {
            Some(n) if n > 0 => Ok(DateFilter::WithinDays(n)),
            _ => Ok(DateFilter::All),
        }
    }

    /// Apply the filter. `today` is the local calendar date the day count
    /// is measured back from.
    pub fn apply(&self, records: Vec<CertificateRecord>, today: NaiveDate) -> Vec<CertificateRecord> {
        match self {
            DateFilter::All => records,
            DateFilter::Between(range) => records
                .into_iter()
                .filter(|record| {
                    not_before_of(record).is_some_and(|not_before| range.contains(not_before))
                })
                .collect(),
            DateFilter::WithinDays(days) => {
                let threshold = today
                    .checked_sub_days(Days::new(u64::from(*days)))
                    .unwrap_or(NaiveDate::MIN);
                tracing::debug!("Keeping certificates issued on or after {}", threshold);

                records
                    .into_iter()
                    .filter(|record| {
                        not_before_of(record).is_some_and(|not_before| not_before.date() >= threshold)
                    })
                    .collect()
            }
        }
    }
}

/// Parsed not_before, or None (with a warning) when it is malformed
fn not_before_of(record: &CertificateRecord) -> Option<NaiveDateTime> {
    match parse_timestamp(&record.not_before) {
        Ok(ts) => Some(ts),
        Err(e) => {
            tracing::warn!(
                "error parsing date in cert {}: '{}': {}",
                record.id,
                record.not_before,
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sample_record;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn ids(records: &[CertificateRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_range_includes_mid_month() {
        let filter = DateFilter::from_args(Some("2021-06-01:2021-06-30"), None).unwrap();
        let records = vec![sample_record(1, "example.com", "2021-06-15T00:00:00")];

        let out = filter.apply(records, date("2024-01-10"));
        assert_eq!(ids(&out), vec![1]);
    }

    #[test]
    fn test_range_excludes_next_month() {
        let filter = DateFilter::from_args(Some("2021-06-01:2021-06-30"), None).unwrap();
        let records = vec![sample_record(1, "example.com", "2021-07-01T00:00:00")];

        assert!(filter.apply(records, date("2024-01-10")).is_empty());
    }

    #[test]
    fn test_range_end_of_last_day_included() {
        let filter = DateFilter::from_args(Some("2021-06-01:2021-06-30"), None).unwrap();
        let records = vec![
            sample_record(1, "a.example.com", "2021-06-30T23:59:59"),
            sample_record(2, "b.example.com", "2021-06-30T12:00:00"),
        ];

        let out = filter.apply(records, date("2024-01-10"));
        assert_eq!(ids(&out), vec![1, 2]);
    }

    #[test]
    fn test_range_start_instant_excluded() {
        let range = DateRange::parse("2021-06-01:2021-06-30").unwrap();

        assert!(!range.contains(parse_timestamp("2021-06-01T00:00:00").unwrap()));
        assert!(range.contains(parse_timestamp("2021-06-01T00:00:01").unwrap()));
        assert!(!range.contains(parse_timestamp("2021-05-31T23:59:59").unwrap()));
    }

    #[test]
    fn test_range_parse_errors() {
        assert!(DateRange::parse("2021-06-01").is_err());
        assert!(DateRange::parse(":2021-06-30").is_err());
        assert!(DateRange::parse("2021-06-01:").is_err());
        assert!(DateRange::parse("2021-13-01:2021-06-30").is_err());
        assert!(DateRange::parse("2021-06-01:june").is_err());
        assert!(DateFilter::from_args(Some("garbage"), None).is_err());
    }

    #[test]
    fn test_range_skips_unparseable_records() {
        let filter = DateFilter::from_args(Some("2021-06-01:2021-06-30"), None).unwrap();
        let records = vec![
            sample_record(1, "a.example.com", "not-a-date"),
            sample_record(2, "b.example.com", "2021-06-10T08:00:00"),
        ];

        let out = filter.apply(records, date("2024-01-10"));
        assert_eq!(ids(&out), vec![2]);
    }

    #[test]
    fn test_days_threshold() {
        let filter = DateFilter::from_args(None, Some(7)).unwrap();
        let records = vec![
            sample_record(1, "a.example.com", "2024-01-03T00:00:00"),
            sample_record(2, "b.example.com", "2024-01-02T23:59:59"),
            sample_record(3, "c.example.com", "2024-01-10T18:30:00"),
        ];

        let out = filter.apply(records, date("2024-01-10"));
        assert_eq!(ids(&out), vec![1, 3]);
    }

    #[test]
    fn test_days_skips_unparseable_records() {
        let filter = DateFilter::WithinDays(30);
        let records = vec![
            sample_record(1, "a.example.com", "2024/01/05"),
            sample_record(2, "b.example.com", "2024-01-05T00:00:00"),
        ];

        let out = filter.apply(records, date("2024-01-10"));
        assert_eq!(ids(&out), vec![2]);
    }

    #[test]
    fn test_between_takes_precedence_over_days() {
        let filter = DateFilter::from_args(Some("2021-06-01:2021-06-30"), Some(7)).unwrap();
        assert!(matches!(filter, DateFilter::Between(_)));
    }

    #[test]
    fn test_no_filter_passes_everything() {
        let filter = DateFilter::from_args(None, None).unwrap();
        assert_eq!(filter, DateFilter::All);

        let records = vec![
            sample_record(1, "a.example.com", "garbage"),
            sample_record(2, "b.example.com", "1999-01-01T00:00:00"),
        ];
        assert_eq!(filter.apply(records, date("2024-01-10")).len(), 2);
    }

    #[test]
    fn test_zero_days_is_no_filter() {
        assert_eq!(DateFilter::from_args(None, Some(0)).unwrap(), DateFilter::All);
        assert_eq!(DateFilter::from_args(Some(""), Some(0)).unwrap(), DateFilter::All);
    }

    #[test]
    fn test_parse_timestamp_with_fraction() {
        let ts = parse_timestamp("2021-06-15T10:12:33.456").unwrap();
        assert_eq!(ts.date(), date("2021-06-15"));
    }
}
