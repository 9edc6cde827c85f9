//! Narrator (game controller): advances the story one decision point at a
//! time.
//!
//! The opening call establishes two setup paragraphs, the question snapshot,
//! and the first instruction pair; every later call advances one paragraph
//! from the running memory and the player's previous choice.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::agents::generate_or_empty;
use crate::agents::parse::{all_captures, first_capture};
use crate::agents::prompt::PromptEngine;
use crate::core::state::AssessmentState;
use crate::core::types::{NarrationOutput, instruction_pair};
use crate::io::generator::TextGenerator;

const OPENING_PREVIOUS_SENTINEL: &str = "opening previous paragraph parse error !!!";
const OPENING_PARAGRAPH_SENTINEL: &str = "opening paragraph parse error !!!";
const OPENING_MEMORY_SENTINEL: &str = "opening memory parse error !!!";
const QUESTION_SENTINEL: &str = "question and options parse error !!!";
const CONTINUE_PARAGRAPH_SENTINEL: &str = "continuation paragraph parse error !!!";
const CONTINUE_MEMORY_SENTINEL: &str = "continuation memory parse error !!!";

static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Paragraph \d+:\s*(.+)").expect("valid pattern"));
static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Summary:\s*(.+)").expect("valid pattern"));
static QUESTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Question and its Options:\s*(.+)").expect("valid pattern"));
static INSTRUCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Instruction \d+:\s*(.+)").expect("valid pattern"));
static OUTPUT_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Output Paragraph:\s*(.+)").expect("valid pattern"));
static UPDATED_MEMORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Updated Memory:\s*(.+)").expect("valid pattern"));

/// Run one narration call, branching on whether this is the opening.
pub fn run_narrator<G: TextGenerator>(generator: &G, state: &AssessmentState) -> NarrationOutput {
    let engine = PromptEngine::new();
    if state.is_opening() {
        let response = generate_or_empty(generator, "narrator", engine.narrator_opening(state));
        parse_opening(&response)
    } else {
        let response = generate_or_empty(generator, "narrator", engine.narrator_continue(state));
        parse_continuation(&response)
    }
}

fn parse_opening(text: &str) -> NarrationOutput {
    let mut paragraphs = all_captures(&PARAGRAPH_RE, text);
    let paragraph = paragraphs
        .pop()
        .unwrap_or_else(|| OPENING_PARAGRAPH_SENTINEL.to_string());
    let previous = paragraphs
        .pop()
        .unwrap_or_else(|| OPENING_PREVIOUS_SENTINEL.to_string());

    NarrationOutput {
        previous_paragraph: Some(previous),
        paragraph,
        memory: first_capture(&SUMMARY_RE, text)
            .unwrap_or_else(|| OPENING_MEMORY_SENTINEL.to_string()),
        instructions: checked_instruction_pair(text),
        question: Some(
            first_capture(&QUESTION_RE, text).unwrap_or_else(|| QUESTION_SENTINEL.to_string()),
        ),
    }
}

fn parse_continuation(text: &str) -> NarrationOutput {
    NarrationOutput {
        previous_paragraph: None,
        paragraph: first_capture(&OUTPUT_PARAGRAPH_RE, text)
            .unwrap_or_else(|| CONTINUE_PARAGRAPH_SENTINEL.to_string()),
        memory: first_capture(&UPDATED_MEMORY_RE, text)
            .unwrap_or_else(|| CONTINUE_MEMORY_SENTINEL.to_string()),
        instructions: checked_instruction_pair(text),
        question: None,
    }
}

fn checked_instruction_pair(text: &str) -> Vec<String> {
    let found = all_captures(&INSTRUCTION_RE, text);
    if found.len() != 2 {
        warn!(
            found = found.len(),
            "narration did not offer exactly two instructions"
        );
    }
    instruction_pair(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::INSTRUCTION_SENTINELS;
    use crate::test_support::{ScriptedGenerator, designed_state};

    const OPENING_RESPONSE: &str = "\
Paragraph 1: You arrive at the glass bridge under a pale sky.
Paragraph 2: A crack splits the first pane; the far side still glitters.
Summary: A traveler reaches a cracked glass bridge.
Question and its Options: The bridge cracked. Is the journey ruined? yes (1) / no (0)
Instruction 1: Turn back; one crack means the whole crossing has failed.
Instruction 2: Test the next pane; one crack is one pane.
";

    const CONTINUE_RESPONSE: &str = "\
Output Paragraph: The next pane holds, and the wind settles as you step forward.
Updated Memory: The traveler crossed the cracked pane and kept going.
Instruction 1: Declare the crossing a triumph and stop checking the panes.
Instruction 2: Keep testing each pane as it comes.
";

    #[test]
    fn opening_parse_takes_the_last_two_paragraphs() {
        let output = parse_opening(OPENING_RESPONSE);
        assert_eq!(
            output.previous_paragraph.as_deref(),
            Some("You arrive at the glass bridge under a pale sky.")
        );
        assert!(output.paragraph.starts_with("A crack splits"));
        assert!(output.memory.starts_with("A traveler"));
        assert!(output.question.expect("question").contains("yes (1)"));
        assert_eq!(output.instructions.len(), 2);
        assert!(output.instructions[0].starts_with("Turn back"));
    }

    #[test]
    fn opening_parse_degrades_to_sentinels() {
        let output = parse_opening("free text with no sections");
        assert_eq!(
            output.previous_paragraph.as_deref(),
            Some(OPENING_PREVIOUS_SENTINEL)
        );
        assert_eq!(output.paragraph, OPENING_PARAGRAPH_SENTINEL);
        assert_eq!(output.memory, OPENING_MEMORY_SENTINEL);
        assert_eq!(output.question.as_deref(), Some(QUESTION_SENTINEL));
        assert_eq!(output.instructions, INSTRUCTION_SENTINELS.to_vec());
    }

    #[test]
    fn continuation_parse_reads_paragraph_memory_and_instructions() {
        let output = parse_continuation(CONTINUE_RESPONSE);
        assert!(output.previous_paragraph.is_none());
        assert!(output.question.is_none());
        assert!(output.paragraph.starts_with("The next pane holds"));
        assert!(output.memory.starts_with("The traveler crossed"));
        assert_eq!(output.instructions.len(), 2);
    }

    #[test]
    fn continuation_paragraph_may_start_on_its_own_line() {
        let response = "Output Paragraph:\n  The pane holds.\nUpdated Memory: m\nInstruction 1: a\nInstruction 2: b\n";
        let output = parse_continuation(response);
        assert_eq!(output.paragraph, "The pane holds.");
    }

    #[test]
    fn single_instruction_becomes_the_sentinel_pair() {
        let response = "Output Paragraph: p\nUpdated Memory: m\nInstruction 1: only choice\n";
        let output = parse_continuation(response);
        assert_eq!(output.instructions, INSTRUCTION_SENTINELS.to_vec());
    }

    #[test]
    fn run_branches_on_the_opening() {
        let generator = ScriptedGenerator::new(vec![OPENING_RESPONSE.to_string()]);
        let state = designed_state();
        let output = run_narrator(&generator, &state);
        assert!(output.previous_paragraph.is_some());
        let requests = generator.requests();
        assert!(requests[0].prompt.contains("Paragraph 1:"));

        let generator = ScriptedGenerator::new(vec![CONTINUE_RESPONSE.to_string()]);
        let mut state = designed_state();
        state.item_index = 1;
        state.scores.push(1);
        let output = run_narrator(&generator, &state);
        assert!(output.previous_paragraph.is_none());
        let requests = generator.requests();
        assert!(requests[0].prompt.contains("Output Paragraph:"));
    }
}
