//! JSONL transcript of an assessment run.
//!
//! Product artifact, not diagnostics: one record per line. A design
//! record, then one record per completed item, then a closing summary. Written
//! only when the caller asks for a transcript path; unaffected by
//! `RUST_LOG`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::step::ItemOutcome;

/// One transcript line.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TranscriptRecord<'a> {
    Design {
        title: &'a str,
        outline: &'a str,
        items: usize,
    },
    Item {
        #[serde(flatten)]
        outcome: &'a ItemOutcome,
    },
    Summary {
        total_score: i64,
        item_scores: &'a [i64],
    },
}

/// Line-buffered JSONL writer, flushed per record so a crashed run still
/// leaves the completed items on disk.
pub struct TranscriptWriter {
    out: BufWriter<File>,
}

impl TranscriptWriter {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create transcript dir {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("create transcript {}", path.display()))?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }

    pub fn write(&mut self, record: &TranscriptRecord<'_>) -> Result<()> {
        let mut line = serde_json::to_string(record).context("serialize transcript record")?;
        line.push('\n');
        self.out
            .write_all(line.as_bytes())
            .context("write transcript record")?;
        self.out.flush().context("flush transcript")
    }
}
