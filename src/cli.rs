//! Command-line configuration surface.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::scheduler::SchedulerConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Ethereum private key brute-force scanner")]
pub struct Args {
    /// Target address list (first comma-separated field per line)
    #[arg(short = 'T', long = "targets", value_name = "FILE", default_value = "targets.csv")]
    pub targets: PathBuf,

    /// Append-only output file for found keys
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = "found_keys.csv")]
    pub output: PathBuf,

    /// Concurrent batches / worker threads (default: auto-detect)
    #[arg(short = 'w', long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Candidates per batch
    #[arg(short = 'b', long = "batch-size", value_name = "N", default_value_t = 10_000)]
    pub batch_size: usize,

    /// Progress report every N keys
    #[arg(long = "report-interval", value_name = "N", default_value_t = 1_000_000)]
    pub report_interval: u64,

    /// Seconds to wait for in-flight batches on shutdown
    #[arg(long = "drain-timeout", value_name = "SECS", default_value_t = 10)]
    pub drain_timeout: u64,
}

impl Args {
    pub fn scheduler_config(&self) -> SchedulerConfig {
        let defaults = SchedulerConfig::default();
        SchedulerConfig {
            workers: self.workers.unwrap_or(defaults.workers),
            batch_size: self.batch_size.max(1),
            report_interval: self.report_interval.max(1),
            drain_timeout: Duration::from_secs(self.drain_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["ethsweep"]);
        assert_eq!(args.targets, PathBuf::from("targets.csv"));
        assert_eq!(args.output, PathBuf::from("found_keys.csv"));
        assert_eq!(args.batch_size, 10_000);
        assert!(args.workers.is_none());
    }

    #[test]
    fn test_explicit_flags() {
        let args = Args::parse_from([
            "ethsweep",
            "-T",
            "top_accounts.csv",
            "-o",
            "hits.csv",
            "-w",
            "8",
            "-b",
            "5000",
            "--drain-timeout",
            "3",
        ]);
        let cfg = args.scheduler_config();
        assert_eq!(cfg.workers, 8);
        assert_eq!(cfg.batch_size, 5_000);
        assert_eq!(cfg.drain_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_zero_batch_size_clamped() {
        let args = Args::parse_from(["ethsweep", "-b", "0"]);
        assert_eq!(args.scheduler_config().batch_size, 1);
    }
}
