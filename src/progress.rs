//! Progress accounting and periodic throughput reports.
//!
//! Single owner: the scheduler records every completed batch from its
//! serialized result loop, so no counter is ever touched concurrently.
//! Reporting is a side effect only and never influences scheduling.

use std::time::{Duration, Instant};

use crate::worker::BatchResult;

/// Point-in-time view emitted when the key counter crosses a reporting
/// boundary.
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    pub total_keys: u64,
    pub total_matches: u64,
    pub elapsed: Duration,
    /// Keys/sec since the previous snapshot.
    pub interval_rate: f64,
    /// Keys/sec over the whole run.
    pub average_rate: f64,
}

pub struct ProgressTracker {
    total_keys: u64,
    total_matches: u64,
    started: Instant,
    report_interval: u64,
    next_report_at: u64,
    last_report: Instant,
    last_report_keys: u64,
}

impl ProgressTracker {
    pub fn new(report_interval: u64) -> Self {
        let now = Instant::now();
        Self {
            total_keys: 0,
            total_matches: 0,
            started: now,
            report_interval: report_interval.max(1),
            next_report_at: report_interval.max(1),
            last_report: now,
            last_report_keys: 0,
        }
    }

    /// Fold one completed batch into the running totals.
    pub fn record(&mut self, result: &BatchResult) {
        self.total_keys += result.keys_processed;
        self.total_matches += result.matches.len() as u64;
    }

    /// Snapshot when the total has crossed a multiple of the reporting
    /// interval since the last report. At most one snapshot per call; a
    /// batch that jumps several boundaries collapses into one report.
    pub fn maybe_report(&mut self) -> Option<ProgressSnapshot> {
        if self.total_keys < self.next_report_at {
            return None;
        }

        let now = Instant::now();
        let since_last = now.duration_since(self.last_report).as_secs_f64();
        let elapsed = now.duration_since(self.started);

        let snapshot = ProgressSnapshot {
            total_keys: self.total_keys,
            total_matches: self.total_matches,
            elapsed,
            interval_rate: if since_last > 0.0 {
                (self.total_keys - self.last_report_keys) as f64 / since_last
            } else {
                0.0
            },
            average_rate: if elapsed.as_secs_f64() > 0.0 {
                self.total_keys as f64 / elapsed.as_secs_f64()
            } else {
                0.0
            },
        };

        self.last_report = now;
        self.last_report_keys = self.total_keys;
        // Skip past every boundary the current total already covers
        self.next_report_at =
            (self.total_keys / self.report_interval + 1) * self.report_interval;

        Some(snapshot)
    }

    pub fn total_keys(&self) -> u64 {
        self.total_keys
    }

    pub fn total_matches(&self) -> u64 {
        self.total_matches
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

pub fn format_num(n: u64) -> String {
    let s = n.to_string();
    let mut r = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            r.push(',');
        }
        r.push(c);
    }
    r.chars().rev().collect()
}

pub fn format_speed(s: f64) -> String {
    if s < 1_000.0 {
        format!("{:.0}/s", s)
    } else if s < 1_000_000.0 {
        format!("{:.1}K/s", s / 1_000.0)
    } else {
        format!("{:.2}M/s", s / 1_000_000.0)
    }
}

pub fn format_time(s: f64) -> String {
    if s < 60.0 {
        format!("{:.0}s", s)
    } else if s < 3600.0 {
        format!("{:.0}m{:.0}s", s / 60.0, s % 60.0)
    } else {
        format!("{:.0}h{:.0}m", s / 3600.0, (s % 3600.0) / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::Match;

    fn batch(keys: u64, matches: usize) -> BatchResult {
        BatchResult {
            matches: (0..matches)
                .map(|_| Match {
                    address: "0xabc".to_string(),
                    private_key: [1u8; 32],
                })
                .collect(),
            keys_processed: keys,
        }
    }

    #[test]
    fn test_totals_equal_sum_of_batches() {
        let mut tracker = ProgressTracker::new(1_000_000);
        let sizes = [10u64, 250, 3, 10_000, 1];
        for &n in &sizes {
            tracker.record(&batch(n, 0));
        }
        assert_eq!(tracker.total_keys(), sizes.iter().sum::<u64>());
        assert_eq!(tracker.total_matches(), 0);
    }

    #[test]
    fn test_match_counter() {
        let mut tracker = ProgressTracker::new(1_000_000);
        tracker.record(&batch(10, 2));
        tracker.record(&batch(10, 1));
        assert_eq!(tracker.total_matches(), 3);
    }

    #[test]
    fn test_report_on_interval_boundary() {
        let mut tracker = ProgressTracker::new(100);

        tracker.record(&batch(99, 0));
        assert!(tracker.maybe_report().is_none());

        tracker.record(&batch(1, 0));
        let snap = tracker.maybe_report().expect("crossed the boundary");
        assert_eq!(snap.total_keys, 100);

        // No double report until the next boundary
        assert!(tracker.maybe_report().is_none());
        tracker.record(&batch(100, 0));
        assert!(tracker.maybe_report().is_some());
    }

    #[test]
    fn test_large_batch_collapses_boundaries() {
        let mut tracker = ProgressTracker::new(10);
        tracker.record(&batch(95, 0));
        assert!(tracker.maybe_report().is_some());
        // 95 skipped nine boundaries; only one report, next at 100
        assert!(tracker.maybe_report().is_none());
        tracker.record(&batch(5, 0));
        assert!(tracker.maybe_report().is_some());
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_num(1_234_567), "1,234,567");
        assert_eq!(format_num(42), "42");
        assert_eq!(format_speed(500.0), "500/s");
        assert_eq!(format_speed(1_500.0), "1.5K/s");
        assert_eq!(format_speed(2_500_000.0), "2.50M/s");
        assert_eq!(format_time(45.0), "45s");
        assert_eq!(format_time(125.0), "2m5s");
    }
}
