//! Bounded-concurrency batch scheduler.
//!
//! W worker threads pull unit jobs from a bounded channel, run one
//! generate-derive-check batch each, and push the result back. The
//! scheduler seeds W jobs and replaces each completed batch one-for-one,
//! so exactly W batches are outstanding while running - backpressure is
//! structural, never a growing queue.
//!
//! All result handling (persistence, accounting, reporting) happens on the
//! scheduler thread. Workers share only the read-only target set and the
//! cancel flag.
//!
//! Cancellation is cooperative: the flag is checked before each
//! resubmission, and in-flight batches run to completion or are abandoned
//! at the drain deadline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, RecvTimeoutError};

use crate::error::Result;
use crate::keygen::KeySource;
use crate::progress::{format_num, format_speed, format_time, ProgressTracker};
use crate::sink::MatchSink;
use crate::targets::TargetSet;
use crate::worker::{run_batch, Match};

/// How often the result loop wakes up to notice a cancel while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shared cancellation flag. Safe to trip from a signal handler thread;
/// repeated trips are no-ops.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true only for the caller that actually flipped the flag.
    pub fn cancel(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Batches kept in flight (= worker threads).
    pub workers: usize,
    /// Candidates per batch.
    pub batch_size: usize,
    /// Progress report every N keys.
    pub report_interval: u64,
    /// How long to wait for in-flight batches after cancellation before
    /// abandoning them.
    pub drain_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map(|p| p.get()).unwrap_or(4),
            batch_size: 10_000,
            report_interval: 1_000_000,
            drain_timeout: Duration::from_secs(10),
        }
    }
}

/// Scheduler lifecycle. `Idle` covers setup before the initial
/// submissions; `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running,
    Draining,
    Stopped,
}

/// Aggregate statistics for a finished search.
#[derive(Debug, Clone)]
pub struct SearchSummary {
    pub total_keys: u64,
    pub total_matches: u64,
    pub elapsed: Duration,
    /// Batches still in flight when the drain deadline expired.
    pub abandoned_batches: usize,
}

pub struct Scheduler<S: KeySource + 'static> {
    cfg: SchedulerConfig,
    source: Arc<S>,
    targets: Arc<TargetSet>,
    cancel: CancelToken,
}

impl<S: KeySource + 'static> Scheduler<S> {
    pub fn new(
        cfg: SchedulerConfig,
        source: Arc<S>,
        targets: Arc<TargetSet>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            cfg,
            source,
            targets,
            cancel,
        }
    }

    /// Run the search until cancelled. Blocks the calling thread; results
    /// are handled here in completion order.
    pub fn run(&self, sink: &mut dyn MatchSink) -> Result<SearchSummary> {
        let workers = self.cfg.workers.max(1);
        let mut state = State::Idle;

        let (job_tx, job_rx) = bounded::<()>(workers);
        let (result_tx, result_rx) = bounded(workers);

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let source = Arc::clone(&self.source);
            let targets = Arc::clone(&self.targets);
            let batch_size = self.cfg.batch_size;

            handles.push(thread::spawn(move || {
                while job_rx.recv().is_ok() {
                    let result = run_batch(source.as_ref(), &targets, batch_size);
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(result_tx);

        // Seed W initial batches; capacity is exactly W so this never blocks
        debug_assert_eq!(state, State::Idle);
        for _ in 0..workers {
            job_tx.send(()).expect("workers hold the receiver");
        }
        let mut job_tx = Some(job_tx);
        let mut in_flight = workers;
        state = State::Running;

        let mut progress = ProgressTracker::new(self.cfg.report_interval);
        let mut drain_deadline = Instant::now();
        let mut abandoned = 0;

        while state != State::Stopped {
            if in_flight == 0 {
                state = State::Stopped;
                continue;
            }

            if state == State::Running && self.cancel.is_cancelled() {
                println!("\n[*] Draining {} in-flight batches...", in_flight);
                // Closing the job channel stops all resubmission; idle
                // workers exit immediately
                job_tx = None;
                drain_deadline = Instant::now() + self.cfg.drain_timeout;
                state = State::Draining;
            }

            let received = match state {
                State::Running => match result_rx.recv_timeout(POLL_INTERVAL) {
                    Ok(r) => r,
                    // Wake up to re-check the cancel flag
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => {
                        state = State::Stopped;
                        continue;
                    }
                },
                State::Draining => {
                    let now = Instant::now();
                    let wait = drain_deadline.saturating_duration_since(now);
                    match result_rx.recv_timeout(wait) {
                        Ok(r) => r,
                        Err(RecvTimeoutError::Timeout) => {
                            abandoned = in_flight;
                            state = State::Stopped;
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => {
                            state = State::Stopped;
                            continue;
                        }
                    }
                }
                State::Idle | State::Stopped => unreachable!("loop runs only after seeding"),
            };
            in_flight -= 1;

            match received {
                Ok(result) => {
                    if !result.matches.is_empty() {
                        // Write precedes acknowledgment: a persist failure
                        // aborts the search rather than dropping a match
                        sink.persist(&result.matches)?;
                        for m in &result.matches {
                            announce_match(m);
                        }
                    }
                    progress.record(&result);
                    if let Some(snap) = progress.maybe_report() {
                        println!(
                            "[⚡] {} keys | {} (avg {}) | {} found | {}",
                            format_num(snap.total_keys),
                            format_speed(snap.interval_rate),
                            format_speed(snap.average_rate),
                            snap.total_matches,
                            format_time(snap.elapsed.as_secs_f64())
                        );
                    }
                }
                Err(e) => {
                    // Transient: the search is retryable per candidate, so
                    // discard the batch and let the replacement run
                    eprintln!("[!] Batch failed: {}", e);
                }
            }

            // One-for-one replacement; skipped once cancelled
            if let Some(tx) = &job_tx {
                if !self.cancel.is_cancelled() && tx.send(()).is_ok() {
                    in_flight += 1;
                }
            }
        }

        if abandoned > 0 {
            eprintln!(
                "[!] Drain timeout: abandoning {} in-flight batches",
                abandoned
            );
            // Stragglers unblock and exit once the result channel drops
            // with this stack frame; their counts are never recorded
        } else {
            for handle in handles {
                handle.join().ok();
            }
        }

        Ok(SearchSummary {
            total_keys: progress.total_keys(),
            total_matches: progress.total_matches(),
            elapsed: progress.elapsed(),
            abandoned_batches: abandoned,
        })
    }
}

fn announce_match(m: &Match) {
    println!(
        "\n\x1b[1;32m[★] MATCH  {}  key {}\x1b[0m",
        m.address,
        hex::encode(m.private_key)
    );
}
