// src/output/count.rs
//! Count-only output

use crate::output::{OutputHandler, Writer};
use crate::types::CertificateRecord;
use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::Mutex;

/// Prints how many certificates survived filtering, no bodies
pub struct CountOutput {
    writer: Mutex<Writer>,
}

impl CountOutput {
    pub fn new() -> Self {
        Self::to_writer(Box::new(io::stdout()))
    }

    pub fn to_file(file: std::fs::File) -> Self {
        Self::to_writer(Box::new(file))
    }

    pub fn to_writer(writer: Writer) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl Default for CountOutput {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_count(count: usize) -> String {
    format!("Number of certs found: {}", count)
}

#[async_trait]
impl OutputHandler for CountOutput {
    async fn emit(&self, records: &[CertificateRecord]) -> anyhow::Result<()> {
        let mut writer = self.writer.lock().map_err(|_| anyhow::anyhow!("output writer poisoned"))?;
        writeln!(writer, "{}", format_count(records.len()))?;
        writer.flush()?;
        Ok(())
    }

    async fn flush(&self) -> anyhow::Result<()> {
        let mut writer = self.writer.lock().map_err(|_| anyhow::anyhow!("output writer poisoned"))?;
        writer.flush()?;
        Ok(())
    }
}
