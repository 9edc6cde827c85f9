//! Assessor configuration stored in `assessor.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Assessor configuration (TOML).
///
/// This file is intended to be edited by humans and must remain stable and
/// automatable. Missing fields default to sensible values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssessorConfig {
    /// Configured ceiling on critic passes per scale item. The run applies
    /// the lesser of this and the fixed ceiling in
    /// [`crate::core::predicates::CRITIC_PASS_CEILING`].
    pub max_critic_iterations: u32,

    /// Hard ceiling on items played per run; also the fallback item count
    /// when the designer returns no scale.
    pub max_player_iterations: usize,

    pub generation: GenerationConfig,

    /// Genres and their topics offered to the designer.
    pub genres: Vec<GenreEntry>,

    /// Constructs this deployment has been exercised with. Unknown
    /// constructs still run, with a warning.
    pub constructs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Command invoked once per generation call; the prompt goes to stdin
    /// and the completion is read from stdout (e.g. `["llm"]`).
    pub command: Vec<String>,

    /// Wall-clock budget for one generation call, in seconds.
    pub timeout_secs: u64,

    /// Truncate a completion beyond this many bytes.
    pub output_limit_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreEntry {
    pub name: String,
    pub topics: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            command: vec!["llm".to_string()],
            timeout_secs: 5 * 60,
            output_limit_bytes: 100_000,
        }
    }
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            max_critic_iterations: 3,
            max_player_iterations: 10,
            generation: GenerationConfig::default(),
            genres: default_genres(),
            constructs: vec![
                "extroversion".to_string(),
                "depression".to_string(),
                "all_or_nothing".to_string(),
                "mind_reading".to_string(),
                "should_statements".to_string(),
            ],
        }
    }
}

fn default_genres() -> Vec<GenreEntry> {
    let catalog = [
        ("Fantasy", &["Adventure", "Magic"][..]),
        ("Romance", &["Love", "Marriage"]),
        ("Science Fiction", &["Space Exploration", "Time Travel"]),
        ("Slice of Life", &["Family", "School"]),
        ("Horror", &["Haunted House", "Paranormal Investigation"]),
    ];
    catalog
        .iter()
        .map(|(name, topics)| GenreEntry {
            name: name.to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

impl AssessorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_player_iterations == 0 {
            return Err(anyhow!("max_player_iterations must be > 0"));
        }
        if self.generation.timeout_secs == 0 {
            return Err(anyhow!("generation.timeout_secs must be > 0"));
        }
        if self.generation.output_limit_bytes == 0 {
            return Err(anyhow!("generation.output_limit_bytes must be > 0"));
        }
        if self.generation.command.is_empty() || self.generation.command[0].trim().is_empty() {
            return Err(anyhow!("generation.command must be a non-empty array"));
        }
        for genre in &self.genres {
            if genre.topics.is_empty() {
                return Err(anyhow!("genre '{}' has no topics", genre.name));
            }
        }
        Ok(())
    }

    /// True when the genre/topic pair is in the catalog.
    pub fn allows(&self, genre: &str, topic: &str) -> bool {
        self.genres
            .iter()
            .any(|entry| entry.name == genre && entry.topics.iter().any(|t| t == topic))
    }

    pub fn knows_construct(&self, construct: &str) -> bool {
        self.constructs.iter().any(|c| c == construct)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AssessorConfig::default()`.
pub fn load_config(path: &Path) -> Result<AssessorConfig> {
    if !path.exists() {
        let cfg = AssessorConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AssessorConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &AssessorConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
