//! Report sinks: where assembled records go.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use sigla_core::errors::ReportError;

use crate::report::ReportRecord;

/// Accepts structured report records. Formatting for humans happens downstream.
pub trait ReportSink: Send + Sync {
    fn name(&self) -> &str {
        "sink"
    }

    fn write(&self, record: &ReportRecord) -> Result<(), ReportError>;

    fn flush(&self) -> Result<(), ReportError> {
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ReportRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Result<Vec<ReportRecord>, ReportError> {
        self.records
            .lock()
            .map(|r| r.clone())
            .map_err(|_| ReportError::Poisoned {
                sink: "memory".to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn write(&self, record: &ReportRecord) -> Result<(), ReportError> {
        self.records
            .lock()
            .map_err(|_| ReportError::Poisoned {
                sink: "memory".to_string(),
            })?
            .push(record.clone());
        Ok(())
    }
}

/// One JSON object per line.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl JsonLinesSink<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, ReportError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, ReportError> {
        self.writer.into_inner().map_err(|_| ReportError::Poisoned {
            sink: "jsonl".to_string(),
        })
    }
}

impl<W: Write + Send> ReportSink for JsonLinesSink<W> {
    fn name(&self) -> &str {
        "jsonl"
    }

    fn write(&self, record: &ReportRecord) -> Result<(), ReportError> {
        let line = serde_json::to_string(record).map_err(|e| ReportError::Serialize {
            record: record.kind().to_string(),
            message: e.to_string(),
        })?;
        let mut writer = self.writer.lock().map_err(|_| ReportError::Poisoned {
            sink: "jsonl".to_string(),
        })?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&self) -> Result<(), ReportError> {
        let mut writer = self.writer.lock().map_err(|_| ReportError::Poisoned {
            sink: "jsonl".to_string(),
        })?;
        writer.flush()?;
        Ok(())
    }
}
