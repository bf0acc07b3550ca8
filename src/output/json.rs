// src/output/json.rs
//! Pretty-printed JSON array output

use crate::output::{OutputHandler, Writer};
use crate::types::{CertificateRecord, EnrichedCertificateRecord};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::{self, Write};
use std::sync::Mutex;

/// JSON output handler
///
/// Writes the whole result set as one array indented by four spaces, each
/// record carrying a `crt_sh_link`. Nothing is written for an empty result.
pub struct JsonOutput {
    writer: Mutex<Writer>,
    link_base: String,
}

impl JsonOutput {
    /// Create a new JsonOutput that writes to stdout
    pub fn new(link_base: &str) -> Self {
        Self::to_writer(Box::new(io::stdout()), link_base)
    }

    /// Create a new JsonOutput that writes to a file
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

/// Render records as a four-space indented JSON array
pub fn render_json(records: &[CertificateRecord], link_base: &str) -> anyhow::Result<String> {
    let enriched: Vec<EnrichedCertificateRecord<'_>> = records
        .iter()
        .map(|record| EnrichedCertificateRecord::new(record, link_base))
        .collect();

    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    enriched.serialize(&mut serializer)?;

    Ok(String::from_utf8(buf)?)
}

#[async_trait]
impl OutputHandler for JsonOutput {
    async fn emit(&self, records: &[CertificateRecord]) -> anyhow::Result<()> {
        if records.is_empty() {
            tracing::info!("No certificates found");
            return Ok(());
        }

        let json = render_json(records, &self.link_base)?;

        let mut writer = self.writer.lock().map_err(|_| anyhow::anyhow!("output writer poisoned"))?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        Ok(())
    }

    async fn flush(&self) -> anyhow::Result<()> {
        let mut writer = self.writer.lock().map_err(|_| anyhow::anyhow!("output writer poisoned"))?;
        writer.flush()?;
        Ok(())
    }
}
