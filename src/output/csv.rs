// src/output/csv.rs
//! CSV output handler

use crate::output::{OutputHandler, Writer};
use crate::types::CertificateRecord;
use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::Mutex;

const HEADER: [&str; 10] = [
    "crt_sh_link",
    "id",
    "issuer_ca_id",
    "issuer_name",
    "common_name",
    "name_value",
    "entry_timestamp",
    "not_before",
    "not_after",
    "serial_number",
];

/// CSV output handler, one header row then one row per certificate
pub struct CsvOutput {
    writer: Mutex<Writer>,
    link_base: String,
}

impl CsvOutput {
    /// Create a new CsvOutput that writes to stdout
    pub fn new(link_base: &str) -> Self {
        Self::to_writer(Box::new(io::stdout()), link_base)
    }

    /// Create a new CsvOutput that writes to a file
    pub fn to_file(file: std::fs::File, link_base: &str) -> Self {
        Self::to_writer(Box::new(file), link_base)
    }

    pub fn to_writer(writer: Writer, link_base: &str) -> Self {
        Self {
            writer: Mutex::new(writer),
            link_base: link_base.to_string(),
        }
    }
}

/// Render records as CSV, quoting fields as needed
pub fn render_csv(records: &[CertificateRecord], link_base: &str) -> anyhow::Result<Vec<u8>> {
    let mut csv_writer = csv::Writer::from_writer(Vec::new());
    csv_writer.write_record(HEADER)?;

    for record in records {
        csv_writer.write_record([
            record.link(link_base),
            record.id.to_string(),
            record.issuer_ca_id.to_string(),
            record.issuer_name.clone(),
            record.common_name.clone(),
            record.name_value.clone(),
            record.entry_timestamp.clone(),
            record.not_before.clone(),
            record.not_after.clone(),
            record.serial_number.clone(),
        ])?;
    }

    Ok(csv_writer.into_inner().map_err(|e| anyhow::anyhow!("CSV flush failed: {}", e))?)
}

#[async_trait]
impl OutputHandler for CsvOutput {
    async fn emit(&self, records: &[CertificateRecord]) -> anyhow::Result<()> {
        let rendered = render_csv(records, &self.link_base)?;

        let mut writer = self.writer.lock().map_err(|_| anyhow::anyhow!("output writer poisoned"))?;
        writer.write_all(&rendered)?;
        writer.flush()?;
        Ok(())
    }

    async fn flush(&self) -> anyhow::Result<()> {
        let mut writer = self.writer.lock().map_err(|_| anyhow::anyhow!("output writer poisoned"))?;
        writer.flush()?;
        Ok(())
    }
}
