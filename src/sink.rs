//! Durable match persistence.
//!
//! A match is the entire value of the search, so every record is synced to
//! disk before the scheduler acknowledges the batch that produced it.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{Result, SweepError};
use crate::worker::Match;

/// Transient write failures get this many attempts before the error is
/// escalated; a confirmed match is never silently dropped.
const WRITE_ATTEMPTS: u32 = 3;

pub trait MatchSink: Send {
    /// Durably append each match as one record. Must not return Ok until
    /// the records have reached disk.
    fn persist(&mut self, matches: &[Match]) -> Result<()>;
}

/// Append-only CSV file: `address,privkey_hex,timestamp` per record.
/// Pre-existing content is preserved.
pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_once(&mut self, matches: &[Match]) -> std::io::Result<()> {
        for m in matches {
            let time = Local::now().format("%Y-%m-%d %H:%M:%S");
            writeln!(
                self.file,
                "{},{},{}",
                m.address,
                hex::encode(m.private_key),
                time
            )?;
        }
        // sync_all forces the records to physical disk before we ack
        self.file.sync_all()
    }
}

impl MatchSink for FileSink {
    fn persist(&mut self, matches: &[Match]) -> Result<()> {
        let mut last_err = None;
        for attempt in 1..=WRITE_ATTEMPTS {
            match self.write_once(matches) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    eprintln!(
                        "[!] match write attempt {}/{} failed: {}",
                        attempt, WRITE_ATTEMPTS, e
                    );
                    last_err = Some(e);
                    // Reopen in case the handle itself went bad
                    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&self.path)
                    {
                        self.file = file;
                    }
                }
            }
        }
        Err(SweepError::Persist {
            attempts: WRITE_ATTEMPTS,
            source: last_err.unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "unknown write failure")
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_match() -> Match {
        Match {
            address: "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf".to_string(),
            private_key: {
                let mut k = [0u8; 32];
                k[31] = 1;
                k
            },
        }
    }

    #[test]
    fn test_record_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("found.csv");

        let mut sink = FileSink::open(&path).unwrap();
        sink.persist(&[sample_match()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let line = content.lines().next().unwrap();
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
        assert_eq!(
            fields[1],
            "0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_append_preserves_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("found.csv");
        fs::write(&path, "0xold,deadbeef,2024-01-01 00:00:00\n").unwrap();

        let mut sink = FileSink::open(&path).unwrap();
        sink.persist(&[sample_match()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0xold,"));
        assert!(lines[1].starts_with("0x7e5f"));
    }

    #[test]
    fn test_multiple_matches_one_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("found.csv");

        let mut sink = FileSink::open(&path).unwrap();
        sink.persist(&[sample_match(), sample_match()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_empty_persist_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("found.csv");

        let mut sink = FileSink::open(&path).unwrap();
        sink.persist(&[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
