//! Batched private key generation.
//!
//! Keys are drawn from the OS CSPRNG (`OsRng`, backed by /dev/urandom on
//! Unix, BCryptGenRandom on Windows). Draws outside the secp256k1 scalar
//! range are rejected and redrawn; an exhausted or failing entropy source is
//! surfaced as an error, never papered over with a weaker generator.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::is_valid_private_key;
use crate::error::{Result, SweepError};

pub type PrivateKey = [u8; 32];

/// Out-of-range draws are ~1 in 2^128; crossing this cap means the RNG is
/// fundamentally broken, not unlucky.
const MAX_REJECTS: u32 = 10_000;

/// Source of candidate private keys. The scheduler only sees this trait,
/// which lets tests inject crafted keys.
pub trait KeySource: Send + Sync {
    /// Generate exactly `n` fresh private keys.
    fn next_batch(&self, n: usize) -> Result<Vec<PrivateKey>>;
}

/// Production source: independent draws from the OS CSPRNG.
pub struct OsKeySource;

impl KeySource for OsKeySource {
    fn next_batch(&self, n: usize) -> Result<Vec<PrivateKey>> {
        let mut keys = Vec::with_capacity(n);
        let mut rejects = 0u32;

        while keys.len() < n {
            let mut key = [0u8; 32];
            OsRng
                .try_fill_bytes(&mut key)
                .map_err(|e| SweepError::Entropy(e.to_string()))?;

            if !is_valid_private_key(&key) {
                rejects += 1;
                if rejects > MAX_REJECTS {
                    return Err(SweepError::Entropy(format!(
                        "{} consecutive out-of-range draws",
                        rejects
                    )));
                }
                continue;
            }

            keys.push(key);
            rejects = 0;
        }

        Ok(keys)
    }
}
