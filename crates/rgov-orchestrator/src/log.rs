//! Decision log sinks (spec §4.4, SPEC_FULL §12).
//!
//! Every window's `DecisionRecord`s must be durably appended before the
//! window is considered complete. `rgov-replay` uses the in-memory
//! sink so the byte-equality law (spec §4.5) can compare sequences
//! without touching a filesystem.

use rgov_core::DecisionRecord;
use std::io::Write;
use std::path::Path;

/// A sink that accepts one `DecisionRecord` at a time, in window order.
pub enum DecisionLog {
    /// Appends one JSON object per line to a file.
    Jsonl(std::fs::File),
    /// Collects records in memory, for tests and replay comparison.
    Memory(Vec<DecisionRecord>),
}

impl DecisionLog {
    pub fn create_jsonl(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::Jsonl(file))
    }

    pub fn memory() -> Self {
        Self::Memory(Vec::new())
    }

    pub fn append(&mut self, record: &DecisionRecord) -> std::io::Result<()> {
        match self {
            Self::Jsonl(file) => {
                let line = serde_json::to_string(record)?;
                writeln!(file, "{line}")?;
                file.flush()
            }
            Self::Memory(records) => {
                records.push(record.clone());
                Ok(())
            }
        }
    }

    /// The records collected so far. Only meaningful for `Memory`;
    /// returns an empty slice for `Jsonl`.
    pub fn records(&self) -> &[DecisionRecord] {
        match self {
            Self::Memory(records) => records,
            Self::Jsonl(_) => &[],
        }
    }
}
