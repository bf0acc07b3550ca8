// src/dedupe.rs
use crate::types::CertificateRecord;
use std::collections::HashSet;

/// Tracks which (name_value, not_before) pairs have been seen.
///
/// crt.sh lists a leaf certificate and its precertificate as separate rows
/// sharing these two values; the leaf comes first and is the one kept.
#[derive(Debug, Default)]
pub struct Dedupe {
    seen: HashSet<String>,
}

impl Dedupe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if this record has not been seen before (and records it)
    pub fn should_emit(&mut self, record: &CertificateRecord) -> bool {
        self.seen.insert(record.dedupe_key())
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Keep the first record per key, preserving response order
pub fn remove_duplicates(records: Vec<CertificateRecord>) -> Vec<CertificateRecord> {
    let mut dedupe = Dedupe::new();
    let before = records.len();

    let deduped: Vec<CertificateRecord> = records
        .into_iter()
        .filter(|record| dedupe.should_emit(record))
        .collect();

    tracing::debug!(
        "Deduplicated {} records down to {} distinct (name, not_before) keys",
        before,
        dedupe.seen_count()
    );

    deduped
}
