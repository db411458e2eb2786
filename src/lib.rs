//! ethsweep: Ethereum Private Key Brute-Force Scanner
//!
//! Architecture:
//! - `targets`: fast address lookup set loaded once at startup
//! - `keygen`: batched private key generation from the OS CSPRNG
//! - `crypto`: private key -> Ethereum address derivation
//! - `worker`: one schedulable generate-derive-check batch
//! - `scheduler`: bounded work pool keeping W batches in flight
//! - `progress`: throughput accounting and periodic reports
//! - `sink`: durable append-only match persistence
//!
//! The scheduler owns all result handling on a single thread; workers share
//! nothing mutable except the atomic cancel flag.

pub mod cli;
pub mod crypto;
pub mod error;
pub mod keygen;
pub mod progress;
pub mod scheduler;
pub mod sink;
pub mod targets;
pub mod worker;
