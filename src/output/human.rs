// src/output/human.rs
//! Human-readable colored terminal output

use crate::output::{OutputHandler, Writer};
use crate::types::CertificateRecord;
use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, Write};
use std::sync::Mutex;

/// Human-readable output handler with colored terminal output
pub struct HumanOutput {
    writer: Mutex<Writer>,
    use_colors: bool,
    link_base: String,
}

impl HumanOutput {
    /// Create a new HumanOutput that writes to stdout
    pub fn new(link_base: &str) -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
            use_colors: is_terminal::is_terminal(std::io::stdout()),
            link_base: link_base.to_string(),
        }
    }

    /// Create a new HumanOutput that writes to a file
    pub fn to_file(file: std::fs::File, link_base: &str) -> Self {
        Self::to_writer(Box::new(file), link_base)
    }

    /// No colors for anything but a terminal
    pub fn to_writer(writer: Writer, link_base: &str) -> Self {
        Self {
            writer: Mutex::new(writer),
            use_colors: false,
            link_base: link_base.to_string(),
        }
    }

    /// SAN values are newline separated in crt.sh output
    fn names(record: &CertificateRecord) -> String {
        record
            .name_value
            .lines()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn write_record(&self, writer: &mut dyn Write, record: &CertificateRecord) -> io::Result<()> {
        let link = record.link(&self.link_base);
        let names = Self::names(record);

        if self.use_colors {
            writeln!(
                writer,
                "{} {} {}",
                format!("[{}]", record.not_before).dimmed(),
                "[+]".green().bold(),
                record.common_name.cyan().bold()
            )?;
            writeln!(writer, "    {} {}", "Names:".dimmed(), names)?;
            writeln!(writer, "    {} {}", "Issuer:".dimmed(), record.issuer_name.yellow())?;
            writeln!(writer, "    {} {}", "Expires:".dimmed(), record.not_after)?;
            writeln!(writer, "    {} {}", "Link:".dimmed(), link.underline())?;
        } else {
            writeln!(writer, "[{}] [+] {}", record.not_before, record.common_name)?;
            writeln!(writer, "    Names: {}", names)?;
            writeln!(writer, "    Issuer: {}", record.issuer_name)?;
            writeln!(writer, "    Expires: {}", record.not_after)?;
            writeln!(writer, "    Link: {}", link)?;
        }

        Ok(())
    }
}

#[async_trait]
impl OutputHandler for HumanOutput {
    async fn emit(&self, records: &[CertificateRecord]) -> anyhow::Result<()> {
        let mut writer = self.writer.lock().map_err(|_| anyhow::anyhow!("output writer poisoned"))?;

        for record in records {
            self.write_record(&mut **writer, record)?;
        }

        writer.flush()?;
        Ok(())
    }

    async fn flush(&self) -> anyhow::Result<()> {
        let mut writer = self.writer.lock().map_err(|_| anyhow::anyhow!("output writer poisoned"))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SharedBuffer;
    use crate::types::{sample_record, DEFAULT_LINK_BASE};

    #[tokio::test]
    async fn test_human_output() {
        let buffer = SharedBuffer::default();
        let handler = HumanOutput::to_writer(Box::new(buffer.clone()), DEFAULT_LINK_BASE);

        let records = vec![sample_record(
            12,
            "example.com\nwww.example.com",
            "2021-06-15T00:00:00",
        )];
        handler.emit(&records).await.unwrap();
        handler.flush().await.unwrap();

        let out = buffer.contents();
        assert!(out.starts_with("[2021-06-15T00:00:00] [+] example.com\n"));
        assert!(out.contains("    Names: example.com, www.example.com\n"));
        assert!(out.contains("    Issuer: C=US, O=Let's Encrypt, CN=R3\n"));
        assert!(out.contains("    Link: https://crt.sh/?id=12\n"));
    }

    #[tokio::test]
    async fn test_human_output_empty() {
        let buffer = SharedBuffer::default();
        let handler = HumanOutput::to_writer(Box::new(buffer.clone()), DEFAULT_LINK_BASE);

        handler.emit(&[]).await.unwrap();
        assert!(buffer.contents().is_empty());
    }
}
