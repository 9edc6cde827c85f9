//! Simulator: plays the part of a player with the construct under test.
//!
//! Index resolution is fuzzy on purpose. Models restate instructions with
//! small edits, so the chosen index is recovered by containment in either
//! direction, and a total miss falls back to the first instruction rather
//! than failing the run.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::agents::generate_or_empty;
use crate::agents::parse::first_capture;
use crate::agents::prompt::PromptEngine;
use crate::core::state::AssessmentState;
use crate::core::types::{ChoiceOutput, FALLBACK_INSTRUCTION};
use crate::io::generator::TextGenerator;

static SELECTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Selected Plan with number:\s*\d+\.\s*(.+)").expect("valid pattern")
});

/// Run one simulated choice over the pending instruction pair.
pub fn run_simulator<G: TextGenerator>(generator: &G, state: &AssessmentState) -> ChoiceOutput {
    let response = generate_or_empty(generator, "simulator", PromptEngine::new().simulator(state));
    resolve_choice(&response, &state.instructions)
}

fn resolve_choice(text: &str, instructions: &[String]) -> ChoiceOutput {
    if let Some(selected) = first_capture(&SELECTED_RE, text) {
        let index = instructions
            .iter()
            .position(|instruction| {
                selected.contains(instruction.as_str()) || instruction.contains(&selected)
            })
            .unwrap_or_else(|| {
                warn!("selected plan matched no pending instruction, defaulting to the first");
                0
            });
        return ChoiceOutput {
            instruction: selected,
            index,
        };
    }

    warn!("simulator response carried no selected plan, defaulting to the first instruction");
    ChoiceOutput {
        instruction: instructions
            .first()
            .cloned()
            .unwrap_or_else(|| FALLBACK_INSTRUCTION.to_string()),
        index: 0,
    }
}
