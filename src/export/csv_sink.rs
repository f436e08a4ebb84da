//! Record sinks.
//!
//! The round controller hands each round's rows to a [`RecordSink`] as one
//! batch. [`CsvSink`] writes the dataset file: the header once at creation,
//! then one appended and flushed batch per round, so a run that fails part
//! way leaves every completed round on disk.

use std::fs::File;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use log::debug;

use super::record::{TrustRecord, HEADER};

/// Destination of per-round dataset rows
pub trait RecordSink {
    /// Append one round's rows
    fn append(&mut self, records: &[TrustRecord]) -> Result<()>;
}

/// CSV dataset file
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
    written: usize,
}

impl CsvSink {
    /// Creates (or truncates) the dataset file and writes the header
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create dataset file {}", path.display()))?;

        // Header is written explicitly; serialized rows must not repeat it
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer
            .write_record(HEADER)
            .with_context(|| format!("Failed to write header to {}", path.display()))?;
        writer.flush()?;

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written so far, header excluded
    pub fn written(&self) -> usize {
        self.written
    }
}

impl RecordSink for CsvSink {
    fn append(&mut self, records: &[TrustRecord]) -> Result<()> {
        for record in records {
            self.writer
                .serialize(record)
                .with_context(|| format!("Failed to write record to {}", self.path.display()))?;
        }
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;

        self.written += records.len();
        debug!("Appended {} rows to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Keeps rows in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<TrustRecord>,
    pub batches: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, records: &[TrustRecord]) -> Result<()> {
        self.records.extend_from_slice(records);
        self.batches += 1;
        Ok(())
    }
}
