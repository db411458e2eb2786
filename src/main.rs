// ethsweep - Ethereum Private Key Brute-Force Scanner
// Random candidates against a fixed target address set.

use std::process;
use std::sync::Arc;

use clap::Parser;

use ethsweep::cli::Args;
use ethsweep::keygen::OsKeySource;
use ethsweep::progress::{format_num, format_speed, format_time};
use ethsweep::scheduler::{CancelToken, Scheduler};
use ethsweep::sink::FileSink;
use ethsweep::targets::TargetSet;

fn main() {
    let args = Args::parse();
    let cfg = args.scheduler_config();

    println!("\n\x1b[1;36methsweep • Ethereum Key Scanner\x1b[0m");

    // Fatal startup: unreadable or empty target list
    let targets = match TargetSet::load(&args.targets) {
        Ok(t) => {
            println!("[✓] Loaded {} targets from {}", format_num(t.len() as u64), args.targets.display());
            if t.skipped() > 0 {
                println!("[!] Skipped {} unusable records", t.skipped());
            }
            Arc::new(t)
        }
        Err(e) => {
            eprintln!("[✗] {}", e);
            process::exit(1);
        }
    };

    let mut sink = match FileSink::open(&args.output) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[✗] Cannot open output {}: {}", args.output.display(), e);
            process::exit(1);
        }
    };

    let cancel = CancelToken::new();
    let cancel_sig = cancel.clone();
    ctrlc::set_handler(move || {
        if cancel_sig.cancel() {
            println!("\n[!] Stopping...");
        }
    })
    .ok();

    println!(
        "[▶] Scanning with {} workers, {} keys/batch (Ctrl+C to stop)\n",
        cfg.workers,
        format_num(cfg.batch_size as u64)
    );

    let scheduler = Scheduler::new(cfg, Arc::new(OsKeySource), targets, cancel);
    let summary = match scheduler.run(&mut sink) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[✗] Search aborted: {}", e);
            process::exit(1);
        }
    };

    let secs = summary.elapsed.as_secs_f64();
    println!(
        "\n[Done] {} keys in {} @ {} | {} matches -> {}",
        format_num(summary.total_keys),
        format_time(secs),
        format_speed(if secs > 0.0 {
            summary.total_keys as f64 / secs
        } else {
            0.0
        }),
        summary.total_matches,
        sink.path().display()
    );
}
