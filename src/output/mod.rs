// src/output/mod.rs
//! Output handling for query results
//!
//! Every format writes to stdout by default or to a file given with
//! `--output`. Handlers receive the full filtered result set at once.

use crate::cli::OutputFormat;
use crate::types::CertificateRecord;
use anyhow::Context;
use async_trait::async_trait;
use std::fs::File;
use std::io::Write;

pub mod count;
pub mod csv;
pub mod human;
pub mod json;

/// Destination shared by all handlers
pub type Writer = Box<dyn Write + Send>;

/// Trait for output handlers that render the filtered certificates
#[async_trait]
pub trait OutputHandler: Send + Sync {
    /// Emit the result set
    async fn emit(&self, records: &[CertificateRecord]) -> anyhow::Result<()>;

    /// Flush any buffered output
    async fn flush(&self) -> anyhow::Result<()>;
}

/// Build the handler for a format, writing to `path` or stdout
pub fn build_handler(
    format: OutputFormat,
    path: Option<&str>,
    link_base: &str,
) -> anyhow::Result<Box<dyn OutputHandler>> {
    let handler: Box<dyn OutputHandler> = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path))?;
            tracing::info!("Writing {:?} output to: {}", format, path);

            match format {
                OutputFormat::Json => Box::new(json::JsonOutput::to_file(file, link_base)),
                OutputFormat::Count => Box::new(count::CountOutput::to_file(file)),
                OutputFormat::Human => Box::new(human::HumanOutput::to_file(file, link_base)),
                OutputFormat::Csv => Box::new(csv::CsvOutput::to_file(file, link_base)),
            }
        }
        None => match format {
            OutputFormat::Json => Box::new(json::JsonOutput::new(link_base)),
            OutputFormat::Count => Box::new(count::CountOutput::new()),
            OutputFormat::Human => Box::new(human::HumanOutput::new(link_base)),
            OutputFormat::Csv => Box::new(csv::CsvOutput::new(link_base)),
        },
    };

    Ok(handler)
}

/// In-memory writer whose contents stay readable after being boxed
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[cfg(test)]
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{sample_record, DEFAULT_LINK_BASE};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_build_handler_stdout() {
        for format in [
            OutputFormat::Json,
            OutputFormat::Count,
            OutputFormat::Human,
            OutputFormat::Csv,
        ] {
            let handler = build_handler(format, None, DEFAULT_LINK_BASE).unwrap();
            assert!(handler.flush().await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_build_handler_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("count.txt");
        let path_str = path.to_str().unwrap();

        let handler = build_handler(OutputFormat::Count, Some(path_str), DEFAULT_LINK_BASE).unwrap();
        let records = vec![sample_record(1, "example.com", "2021-06-15T00:00:00")];
        handler.emit(&records).await.unwrap();
        handler.flush().await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Number of certs found: 1\n");
    }

    #[test]
    fn test_build_handler_bad_path() {
        let result = build_handler(
            OutputFormat::Json,
            Some("/nonexistent/dir/out.json"),
            DEFAULT_LINK_BASE,
        );
        assert!(result.is_err());
    }
}
