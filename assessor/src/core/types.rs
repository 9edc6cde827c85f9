//! Shared deterministic types for the assessment core.
//!
//! These types define stable contracts between the iteration controller and
//! the content generators. They must not depend on I/O and must remain
//! deterministic across runs.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Instruction text used when a generator cannot produce a usable choice.
pub const FALLBACK_INSTRUCTION: &str = "Press onward.";

/// Deterministic pair substituted when an instruction list comes back short.
pub const INSTRUCTION_SENTINELS: [&str; 2] = [
    "instruction 1 parse error !!!",
    "instruction 2 parse error !!!",
];

/// One labeled, scored option of a scale item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleOption {
    pub label: String,
    pub score: i64,
}

/// One self-report question plus its ordered, labeled, scored options.
///
/// Serialized as `{"question": ..., "options": {label: score, ...}}`, the
/// line format of the scale payload and of the designer's redesigned scale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleItem {
    pub question: String,
    #[serde(default)]
    pub options: OptionList,
}

/// Ordered option mapping.
///
/// Option position carries meaning (the Nth narrative instruction maps to the
/// Nth option), and a plain map type does not guarantee document order, so
/// (de)serialization goes through a hand-rolled visitor that keeps options in
/// the order they appear in the JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList(pub Vec<ScaleOption>);

impl OptionList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScaleOption> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScaleOption> {
        self.0.iter()
    }
}

impl Serialize for OptionList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for option in &self.0 {
            map.serialize_entry(&option.label, &option.score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OptionList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OptionListVisitor;

        impl<'de> Visitor<'de> for OptionListVisitor {
            type Value = OptionList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from option label to integer score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut options = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, score)) = access.next_entry::<String, i64>()? {
                    options.push(ScaleOption { label, score });
                }
                Ok(OptionList(options))
            }
        }

        deserializer.deserialize_map(OptionListVisitor)
    }
}

/// Normalize a parsed instruction list to exactly two entries.
///
/// A shorter or empty list is replaced wholesale by the sentinel pair so the
/// instruction/option index alignment stays deterministic; extra entries
/// beyond the pair are dropped.
pub fn instruction_pair(mut found: Vec<String>) -> Vec<String> {
    if found.len() < 2 {
        return INSTRUCTION_SENTINELS.iter().map(|s| s.to_string()).collect();
    }
    found.truncate(2);
    found
}

/// Structured result of the design stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignOutput {
    pub title: String,
    pub rationale: String,
    pub outline: String,
    /// The redesigned scale. Empty means the run cannot proceed.
    pub scale: Vec<ScaleItem>,
}

/// Structured result of a narration (game controller) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationOutput {
    /// Only present on the opening call, which establishes two paragraphs.
    pub previous_paragraph: Option<String>,
    pub paragraph: String,
    pub memory: String,
    /// Always exactly two entries after normalization.
    pub instructions: Vec<String>,
    /// Question+options snapshot, only present on the opening call.
    pub question: Option<String>,
}

/// Structured result of a critic pass. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CritiqueOutput {
    pub paragraph: Option<String>,
    pub memory: Option<String>,
    pub instructions: Option<Vec<String>>,
}

/// Structured result of a simulated player choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOutput {
    /// Text of the chosen instruction.
    pub instruction: String,
    /// 0-based index into the pending instruction pair.
    pub index: usize,
}
