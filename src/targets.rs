//! Target address loader and matcher.
//!
//! Loads a newline-delimited target list (first comma-separated field per
//! record is the address) into an FxHashSet for O(1) lookup. FxHash beats
//! the default SipHash noticeably on short fixed-shape keys like addresses.
//!
//! Addresses are normalized to ASCII lowercase at build time; callers must
//! normalize before lookup (`contains` does this).

use std::fs;
use std::path::Path;

use fxhash::FxHashSet;
use rayon::prelude::*;

use crate::error::{Result, SweepError};

/// Immutable, read-only after construction. Shared across all workers
/// without synchronization.
pub struct TargetSet {
    addresses: FxHashSet<String>,
    skipped: usize,
}

impl TargetSet {
    /// Load targets from a flat file. Empty and malformed records are
    /// skipped; an unreadable file or a resulting empty set is fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_records(&content).ok_or_else(|| SweepError::EmptyTargetList {
            path: path.to_path_buf(),
        })
    }

    /// Build from in-memory record lines. Returns None when no usable
    /// target survives filtering.
    pub fn from_records(content: &str) -> Option<Self> {
        let lines: Vec<&str> = content.lines().collect();
        let total = lines.len();

        // Normalization is per-line independent, so decode in parallel
        let addresses: FxHashSet<String> = lines
            .par_iter()
            .filter_map(|line| normalize_record(line))
            .collect();

        if addresses.is_empty() {
            return None;
        }

        let skipped = total - addresses.len();
        Some(Self { addresses, skipped })
    }

    /// Case-insensitive exact membership test.
    #[inline]
    pub fn contains(&self, address: &str) -> bool {
        if address.chars().any(|c| c.is_ascii_uppercase()) {
            self.addresses.contains(&address.to_ascii_lowercase())
        } else {
            self.addresses.contains(address)
        }
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Records dropped during load (malformed, empty, duplicate).
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// First comma-separated field, trimmed and lowercased. None for records
/// with an empty first field.
fn normalize_record(line: &str) -> Option<String> {
    let field = line.split(',').next()?.trim();
    if field.is_empty() {
        return None;
    }
    Some(field.to_ascii_lowercase())
}
