//! One schedulable unit of work: generate a batch, derive each address,
//! check membership.

use crate::crypto::{derive_address, is_valid_private_key};
use crate::error::{Result, SweepError};
use crate::keygen::{KeySource, PrivateKey};
use crate::targets::TargetSet;

/// A candidate whose derived address is in the target set. Consumed exactly
/// once by the sink, then dropped.
#[derive(Debug, Clone)]
pub struct Match {
    pub address: String,
    pub private_key: PrivateKey,
}

/// Completed batch: matches (usually empty) plus exact accounting.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub matches: Vec<Match>,
    pub keys_processed: u64,
}

/// Process exactly `batch_size` candidates against `targets`.
///
/// Never returns a partial count: a generation failure aborts the whole
/// batch so the scheduler's accounting stays exact.
pub fn run_batch(
    source: &dyn KeySource,
    targets: &TargetSet,
    batch_size: usize,
) -> Result<BatchResult> {
    let keys = source.next_batch(batch_size)?;

    let mut result = BatchResult::default();
    for key in keys {
        // OsKeySource never emits these, but KeySource is a public seam;
        // an out-of-range key is a batch-level error, not a worker panic
        if !is_valid_private_key(&key) {
            return Err(SweepError::InvalidCandidate);
        }
        let address = derive_address(&key);
        if targets.contains(&address) {
            result.matches.push(Match {
                address,
                private_key: key,
            });
        }
        result.keys_processed += 1;
    }

    Ok(result)
}
