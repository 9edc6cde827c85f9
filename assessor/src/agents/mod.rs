//! Content generators: state view in, structured delta out.
//!
//! Each generator renders a prompt, makes one call to the generation
//! service, and extracts a structured result from the free-form response.
//! The contracts are total: transport failures degrade to an empty response
//! and parse failures to sentinel values, so the iteration controller never
//! sees an error from this layer.

pub mod critic;
pub mod designer;
pub mod narrator;
mod parse;
pub mod prompt;
pub mod simulator;

use anyhow::Result;
use tracing::warn;

use crate::io::generator::{GenerateRequest, TextGenerator};

/// Call the generation service, mapping render and transport failures to an
/// empty response for the parser to degrade from.
pub(crate) fn generate_or_empty<G: TextGenerator>(
    generator: &G,
    agent: &'static str,
    prompt: Result<String>,
) -> String {
    let prompt = match prompt {
        Ok(prompt) => prompt,
        Err(err) => {
            warn!(agent, error = %err, "prompt rendering failed, degrading to empty response");
            return String::new();
        }
    };
    match generator.generate(&GenerateRequest { agent, prompt }) {
        Ok(response) => response,
        Err(err) => {
            warn!(agent, error = %err, "generation failed, degrading to empty response");
            String::new()
        }
    }
}
