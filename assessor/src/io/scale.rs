//! Scale payload loading: line-delimited JSON, schema-checked.
//!
//! Input payloads are validated strictly against the bundled item schema;
//! a bad input file should fail before any generation happens. (The
//! designer's redesigned scale is parsed leniently instead, over in
//! `agents::designer`, because model output is untrusted by contract.)

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use jsonschema::{Draft, Validator};
use serde_json::Value;

use crate::core::types::ScaleItem;

const SCALE_ITEM_SCHEMA: &str = include_str!("../../schemas/scale_item.schema.json");

static ITEM_VALIDATOR: LazyLock<Validator> = LazyLock::new(|| {
    let schema: Value =
        serde_json::from_str(SCALE_ITEM_SCHEMA).expect("bundled item schema should be valid JSON");
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .expect("bundled item schema should compile")
});

/// A loaded scale payload: the raw text (quoted verbatim in the design
/// prompt) plus its parsed items in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalePayload {
    pub raw: String,
    pub items: Vec<ScaleItem>,
}

/// Read and validate a scale payload file.
pub fn load_scale_file(path: &Path) -> Result<ScalePayload> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let items = parse_scale_payload(&raw)
        .with_context(|| format!("invalid scale payload {}", path.display()))?;
    Ok(ScalePayload { raw, items })
}

/// Parse a line-delimited JSON payload, validating every non-empty line
/// against the item schema. Order is significant and preserved.
pub fn parse_scale_payload(payload: &str) -> Result<Vec<ScaleItem>> {
    let mut items = Vec::new();
    for (lineno, line) in payload.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("line {}: not valid JSON", lineno + 1))?;
        let messages: Vec<String> = ITEM_VALIDATOR
            .iter_errors(&value)
            .map(|err| err.to_string())
            .collect();
        if !messages.is_empty() {
            bail!("line {}: {}", lineno + 1, messages.join("; "));
        }
        let item: ScaleItem = serde_json::from_value(value)
            .with_context(|| format!("line {}: not a scale item", lineno + 1))?;
        items.push(item);
    }
    if items.is_empty() {
        bail!("scale payload contains no items");
    }
    Ok(items)
}
