// src/cli.rs
use clap::Parser;

/// crt-query: Certificate Transparency search via crt.sh
///
/// Look up certificates logged for a domain pattern, drop the duplicate
/// precertificate rows, optionally filter by issue date, and print them.
#[derive(Parser, Debug, Clone)]
#[command(name = "crt-query")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    // ===== Query =====
    /// Domain to find certificates for. % is a wildcard
    #[arg(short = 'd', long = "domain")]
    pub domain: String,

    /// The dates to run the query for in the format start-date:end-date.
    /// The dates should have the format YYYY-MM-DD
    #[arg(long = "between")]
    pub between: Option<String>,

    /// How many days back to query
    #[arg(long = "days")]
    pub days: Option<u32>,

    // ===== Output =====
    /// Don't return the results, just the count
    #[arg(short = 'c', long = "count")]
    pub count: bool,

    /// One line per certificate instead of JSON
    #[arg(long = "human")]
    pub human: bool,

    /// Output certificates in CSV format
    #[arg(long = "csv")]
    pub csv: bool,

    /// Write output to file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    // ===== Configuration =====
    /// Path to TOML config file
    #[arg(long = "config")]
    pub config: Option<String>,

    /// Override request timeout in seconds
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,

    /// Override number of retries on transient failures
    #[arg(long = "retries")]
    pub retries: Option<u32>,

    // ===== Display & Logging =====
    /// Disable progress indicator
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Verbose logging (set log level to debug)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Quiet logging (set log level to warn)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    /// Validate flag combinations and return errors for invalid usage
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.domain.trim().is_empty() {
            anyhow::bail!("--domain must not be empty");
        }

        if self.human && self.csv {
            anyhow::bail!(
                "Cannot specify multiple output formats. \
                Choose one of: --human or --csv"
            );
        }

        if self.verbose && self.quiet {
            anyhow::bail!("Cannot specify both --verbose and --quiet");
        }

        if self.timeout == Some(0) {
            anyhow::bail!("--timeout must be greater than 0");
        }

        Ok(())
    }

    /// Determine the output format based on flags
    pub fn output_format(&self) -> OutputFormat {
        if self.count {
            OutputFormat::Count
        } else if self.human {
            OutputFormat::Human
        } else if self.csv {
            OutputFormat::Csv
        } else {
            OutputFormat::Json
        }
    }

    /// Check if progress indicator should be enabled
    pub fn should_show_progress(&self) -> bool {
        !self.no_progress && !self.quiet
    }

    /// Log level from verbose/quiet flags, None when neither is set
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("warn")
        } else {
            None
        }
    }
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON array (default)
    Json,
    /// Only the number of certificates found
    Count,
    /// Human-readable colored text output
    Human,
    /// CSV format
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_required() {
        assert!(Cli::try_parse_from(["crt-query"]).is_err());
        assert!(Cli::try_parse_from(["crt-query", "--count"]).is_err());
    }

    #[test]
    fn test_domain_short_and_long() {
        let cli = Cli::parse_from(["crt-query", "-d", "%.example.com"]);
        assert_eq!(cli.domain, "%.example.com");

        let cli = Cli::parse_from(["crt-query", "--domain", "example.com"]);
        assert_eq!(cli.domain, "example.com");
    }

    #[test]
    fn test_default_is_json() {
        let cli = Cli::parse_from(["crt-query", "-d", "example.com"]);
        assert_eq!(cli.output_format(), OutputFormat::Json);
        assert!(cli.between.is_none());
        assert!(cli.days.is_none());
        assert!(!cli.count);
    }

    #[test]
    fn test_count_flag() {
        let cli = Cli::parse_from(["crt-query", "-d", "example.com", "-c"]);
        assert_eq!(cli.output_format(), OutputFormat::Count);
    }

    #[test]
    fn test_count_wins_over_format() {
        let cli = Cli::parse_from(["crt-query", "-d", "example.com", "--csv", "--count"]);
        assert_eq!(cli.output_format(), OutputFormat::Count);
    }

    #[test]
    fn test_human_and_csv_formats() {
        let cli = Cli::parse_from(["crt-query", "-d", "example.com", "--human"]);
        assert_eq!(cli.output_format(), OutputFormat::Human);

        let cli = Cli::parse_from(["crt-query", "-d", "example.com", "--csv"]);
        assert_eq!(cli.output_format(), OutputFormat::Csv);
    }

    #[test]
    fn test_filters() {
        let cli = Cli::parse_from([
            "crt-query",
            "-d", "example.com",
            "--between", "2021-06-01:2021-06-30",
            "--days", "7",
        ]);
        assert_eq!(cli.between.as_deref(), Some("2021-06-01:2021-06-30"));
        assert_eq!(cli.days, Some(7));
    }

    #[test]
    fn test_negative_days_rejected() {
        assert!(Cli::try_parse_from(["crt-query", "-d", "example.com", "--days", "-1"]).is_err());
    }

    #[test]
    fn test_multiple_formats_invalid() {
        let cli = Cli::parse_from(["crt-query", "-d", "example.com", "--human", "--csv"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_verbose_and_quiet_invalid() {
        let cli = Cli::parse_from(["crt-query", "-d", "example.com", "-v", "-q"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_blank_domain_invalid() {
        let cli = Cli::parse_from(["crt-query", "-d", "  "]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_invalid() {
        let cli = Cli::parse_from(["crt-query", "-d", "example.com", "--timeout", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_valid_combination() {
        let cli = Cli::parse_from([
            "crt-query", "-d", "example.com", "--csv", "-o", "out.csv", "--retries", "2",
        ]);
        assert!(cli.validate().is_ok());
        assert_eq!(cli.output.as_deref(), Some("out.csv"));
        assert_eq!(cli.retries, Some(2));
    }

    #[test]
    fn test_progress() {
        let cli = Cli::parse_from(["crt-query", "-d", "example.com"]);
        assert!(cli.should_show_progress());

        let cli = Cli::parse_from(["crt-query", "-d", "example.com", "--no-progress"]);
        assert!(!cli.should_show_progress());

        let cli = Cli::parse_from(["crt-query", "-d", "example.com", "-q"]);
        assert!(!cli.should_show_progress());
    }

    #[test]
    fn test_log_level_override() {
        let cli = Cli::parse_from(["crt-query", "-d", "example.com", "--verbose"]);
        assert_eq!(cli.log_level_override(), Some("debug"));

        let cli = Cli::parse_from(["crt-query", "-d", "example.com", "--quiet"]);
        assert_eq!(cli.log_level_override(), Some("warn"));

        let cli = Cli::parse_from(["crt-query", "-d", "example.com"]);
        assert_eq!(cli.log_level_override(), None);
    }
}
