//! Critic: bounded self-refinement of freshly narrated content.
//!
//! Each field of the critique is either a full replacement or the literal
//! `OK`, meaning "leave unchanged". A missing section counts as `OK`.

use tracing::warn;

use crate::agents::generate_or_empty;
use crate::agents::parse::labeled_line;
use crate::agents::prompt::PromptEngine;
use crate::core::state::AssessmentState;
use crate::core::types::{CritiqueOutput, instruction_pair};
use crate::io::generator::TextGenerator;

const NO_CHANGE: &str = "OK";

const PARAGRAPH_LABEL: &str = "For Generated Story Paragraph:";
const MEMORY_LABEL: &str = "For Short Memory:";
const INSTRUCTIONS_LABEL: &str = "For Next Instructions:";

/// Run one critic pass over the current narration.
pub fn run_critic<G: TextGenerator>(generator: &G, state: &AssessmentState) -> CritiqueOutput {
    let response = generate_or_empty(generator, "critic", PromptEngine::new().critic(state));
    parse_critique(&response)
}

fn parse_critique(text: &str) -> CritiqueOutput {
    CritiqueOutput {
        paragraph: replacement(text, PARAGRAPH_LABEL),
        memory: replacement(text, MEMORY_LABEL),
        instructions: replacement(text, INSTRUCTIONS_LABEL)
            .map(|value| parse_instruction_array(&value)),
    }
}

fn replacement(text: &str, label: &str) -> Option<String> {
    labeled_line(text, label).filter(|value| value != NO_CHANGE)
}

/// An instruction replacement must be a JSON array; anything else falls back
/// to the sentinel pair rather than a misaligned list.
fn parse_instruction_array(value: &str) -> Vec<String> {
    if value.starts_with('[') && value.ends_with(']') {
        match serde_json::from_str::<Vec<String>>(value) {
            Ok(parsed) => return instruction_pair(parsed),
            Err(err) => warn!(error = %err, "critic instruction array failed to parse"),
        }
    } else {
        warn!("critic instruction replacement was not a JSON array");
    }
    instruction_pair(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::INSTRUCTION_SENTINELS;
    use crate::test_support::ScriptedGenerator;
    use crate::test_support::designed_state;

    #[test]
    fn ok_sections_mean_no_change() {
        let response = "For Generated Story Paragraph: OK\nFor Short Memory: OK\nFor Next Instructions: OK\n";
        let output = parse_critique(response);
        assert_eq!(output, CritiqueOutput::default());
    }

    #[test]
    fn missing_sections_mean_no_change() {
        let output = parse_critique("the critic rambled instead of using the format");
        assert_eq!(output, CritiqueOutput::default());
    }

    #[test]
    fn replacements_are_applied_per_field() {
        let response = "For Generated Story Paragraph: A tighter paragraph.\nFor Short Memory: OK\nFor Next Instructions: [\"cross now\", \"wait for dawn\"]\n";
        let output = parse_critique(response);
        assert_eq!(output.paragraph.as_deref(), Some("A tighter paragraph."));
        assert!(output.memory.is_none());
        assert_eq!(
            output.instructions,
            Some(vec!["cross now".to_string(), "wait for dawn".to_string()])
        );
    }

    #[test]
    fn non_array_instruction_replacement_becomes_sentinels() {
        let response = "For Next Instructions: just do the first one\n";
        let output = parse_critique(response);
        assert_eq!(output.instructions, Some(INSTRUCTION_SENTINELS.map(String::from).to_vec()));
    }

    #[test]
    fn broken_array_instruction_replacement_becomes_sentinels() {
        let response = "For Next Instructions: [\"unterminated]\n";
        let output = parse_critique(response);
        assert_eq!(output.instructions, Some(INSTRUCTION_SENTINELS.map(String::from).to_vec()));
    }

    #[test]
    fn run_sends_one_critic_prompt() {
        let generator = ScriptedGenerator::new(vec!["For Short Memory: shorter\n".to_string()]);
        let mut state = designed_state();
        state.instructions = vec!["a".to_string(), "b".to_string()];
        let output = run_critic(&generator, &state);
        assert_eq!(output.memory.as_deref(), Some("shorter"));
        let requests = generator.requests();
        assert_eq!(requests[0].agent, "critic");
    }
}
