// src/query.rs
//! The query pipeline: fetch, decode, dedupe, date filter.

use crate::crtsh::{decode_concatenated, CrtShClient, StreamEnd};
use crate::dedupe::remove_duplicates;
use crate::filter::DateFilter;
use crate::progress::ProgressIndicator;
use crate::types::CertificateRecord;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::info;

/// Everything one invocation needs to know, fixed at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Domain pattern, `%` is a wildcard
    pub domain: String,
    pub filter: DateFilter,
    /// Local calendar date `--days` counts back from
    pub today: NaiveDate,
}

impl QueryOptions {
    pub fn new(domain: impl Into<String>, filter: DateFilter) -> Self {
        Self {
            domain: domain.into(),
            filter,
            today: Local::now().date_naive(),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// Result of a query plus counts from each stage
#[derive(Debug)]
pub struct QueryReport {
    pub records: Vec<CertificateRecord>,
    pub fetched: usize,
    pub unique: usize,
    pub stream_end: StreamEnd,
}

/// Decode, dedupe and filter a raw crt.sh response body
pub fn process(body: &[u8], options: &QueryOptions) -> QueryReport {
    let decoded = decode_concatenated(body);
    let fetched = decoded.records.len();

    let deduped = remove_duplicates(decoded.records);
    let unique = deduped.len();

    let records = options.filter.apply(deduped, options.today);

    QueryReport {
        records,
        fetched,
        unique,
        stream_end: decoded.end,
    }
}

/// Run the whole query against crt.sh
pub async fn run_query(
    client: &CrtShClient,
    options: &QueryOptions,
    progress: &ProgressIndicator,
) -> Result<QueryReport> {
    progress.set_message(format!("Querying crt.sh for {}", options.domain));

    let body = client
        .fetch_with_progress(&options.domain, progress)
        .await
        .with_context(|| format!("Error querying crt.sh for '{}'", options.domain))?;

    progress.set_message("Processing results");
    let report = process(&body, options);
    progress.finish();

    info!(
        "Found {} certificates ({} unique), {} after date filter",
        report.fetched,
        report.unique,
        report.records.len()
    );

    Ok(report)
}
