//! I/O edges of the assessor: config, scale files, process-backed
//! generation, and transcripts.

pub mod config;
pub mod generator;
pub mod process;
pub mod scale;
pub mod transcript;
