//! Test-only helpers: fixtures and scripted generation.

use std::cell::RefCell;
use std::collections::VecDeque;

use anyhow::{Result, anyhow};

use crate::core::state::{AssessmentInputs, AssessmentState};
use crate::core::types::{DesignOutput, OptionList, ScaleItem, ScaleOption};
use crate::io::generator::{GenerateRequest, TextGenerator};

/// Deterministic run inputs for a two-line yes/no payload.
pub fn inputs() -> AssessmentInputs {
    AssessmentInputs {
        construct: "all_or_nothing".to_string(),
        scale_payload: "{\"question\": \"One setback ruins everything.\", \"options\": {\"yes\": 1, \"no\": 0}}\n{\"question\": \"A plan with one flaw is worthless.\", \"options\": {\"yes\": 1, \"no\": 0}}\n".to_string(),
        genre: "Fantasy".to_string(),
        topic: "Adventure".to_string(),
    }
}

/// A scale item with options `yes -> 1`, `no -> 0` in that order.
pub fn yes_no_item(question: &str) -> ScaleItem {
    ScaleItem {
        question: question.to_string(),
        options: OptionList(vec![
            ScaleOption {
                label: "yes".to_string(),
                score: 1,
            },
            ScaleOption {
                label: "no".to_string(),
                score: 0,
            },
        ]),
    }
}

/// State fresh from the initial inputs, before the design stage.
pub fn fresh_state() -> AssessmentState {
    AssessmentState::new(inputs())
}

/// State with a two-item design applied.
pub fn designed_state() -> AssessmentState {
    let mut state = fresh_state();
    state.apply_design(DesignOutput {
        title: "The Glass Bridge".to_string(),
        rationale: "A traveler who judges every setback as total ruin.".to_string(),
        outline: "1. The bridge cracks; 2. The storm turns.".to_string(),
        scale: vec![
            yes_no_item("The bridge cracked. Is the journey ruined?"),
            yes_no_item("The storm turned. Was the plan worthless?"),
        ],
    });
    state
}

/// Generator that returns predetermined responses in order and records every
/// request. Running out of responses returns an error, which the agents
/// absorb as a degraded (sentinel) result.
pub struct ScriptedGenerator {
    responses: RefCell<VecDeque<String>>,
    requests: RefCell<Vec<GenerateRequest>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.borrow().clone()
    }

    /// Requests made by the named agent.
    pub fn requests_for(&self, agent: &str) -> Vec<GenerateRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|request| request.agent == agent)
            .cloned()
            .collect()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, request: &GenerateRequest) -> Result<String> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("scripted generator ran out of responses"))
    }
}

/// Generator whose every call fails, for exercising transport degradation.
pub struct FailingGenerator;

impl TextGenerator for FailingGenerator {
    fn generate(&self, _request: &GenerateRequest) -> Result<String> {
        Err(anyhow!("scripted transport failure"))
    }
}

/// Instruction texts used by the canned narration responses below.
pub const SCRIPTED_INSTRUCTIONS: [&str; 2] = ["take the yes path", "take the no path"];

/// A designer response carrying the given items in jsonl form.
pub fn designer_response(items: &[ScaleItem]) -> String {
    let mut lines = String::new();
    for item in items {
        lines.push_str(&serde_json::to_string(item).expect("serialize item"));
        lines.push('\n');
    }
    format!(
        "Name: The Glass Bridge\n\nThoughts: A traveler who judges every setback as total ruin.\n\nOutline: 1. The bridge cracks; 2. The storm turns.\n\nScale Questions in Order:\n{lines}"
    )
}

/// An opening narration response with the scripted instruction pair.
pub fn opening_narration_response() -> String {
    format!(
        "Paragraph 1: You arrive at the glass bridge.\nParagraph 2: A crack splits the first pane.\nSummary: A traveler reaches a cracked bridge.\nQuestion and its Options: Is the journey ruined? yes (1) / no (0)\nInstruction 1: {}\nInstruction 2: {}\n",
        SCRIPTED_INSTRUCTIONS[0], SCRIPTED_INSTRUCTIONS[1]
    )
}

/// A continuation narration response with the scripted instruction pair.
pub fn continuation_response() -> String {
    format!(
        "Output Paragraph: The story moves on.\nUpdated Memory: The traveler pressed on.\nInstruction 1: {}\nInstruction 2: {}\n",
        SCRIPTED_INSTRUCTIONS[0], SCRIPTED_INSTRUCTIONS[1]
    )
}

/// A critic response that changes nothing.
pub fn critic_ok_response() -> String {
    "For Generated Story Paragraph: OK\nFor Short Memory: OK\nFor Next Instructions: OK\n"
        .to_string()
}

/// A simulator response picking the instruction at `index` (0-based).
pub fn simulator_picks(index: usize) -> String {
    format!(
        "Selected Plan with number: {}. {}\n",
        index + 1,
        SCRIPTED_INSTRUCTIONS[index]
    )
}

/// The full response script for a run over `items`, with the simulator
/// always picking `pick_index` and `critic_passes` critic calls per item.
pub fn full_run_script(items: &[ScaleItem], pick_index: usize, critic_passes: u32) -> Vec<String> {
    let mut script = vec![designer_response(items)];
    for item_index in 0..items.len() {
        script.push(if item_index == 0 {
            opening_narration_response()
        } else {
            continuation_response()
        });
        for _ in 0..critic_passes {
            script.push(critic_ok_response());
        }
        script.push(simulator_picks(pick_index));
    }
    script
}
