//! Designer: turns the raw self-report scale into a titled game frame and a
//! redesigned scale whose items follow the story outline.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::agents::generate_or_empty;
use crate::agents::parse::first_capture;
use crate::agents::prompt::PromptEngine;
use crate::core::state::AssessmentState;
use crate::core::types::{DesignOutput, ScaleItem};
use crate::io::generator::TextGenerator;

const TITLE_SENTINEL: &str = "designer title parse error !!!";
const RATIONALE_SENTINEL: &str = "designer thoughts parse error !!!";
const OUTLINE_SENTINEL: &str = "1. designer outline parse error !!!";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Name:\s*(.+)").expect("valid pattern"));
static THOUGHTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Thoughts:\s*(.+?)\s*Outline:").expect("valid pattern"));
static OUTLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Outline:\s*(.+?)\s*Scale Questions in Order:").expect("valid pattern")
});
static SCALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Scale Questions in Order:\s*(.+)").expect("valid pattern"));

/// Run the design stage once against the initial inputs.
///
/// Never fails; a response the parser cannot use yields sentinel text and an
/// empty scale, which the controller treats as the fatal design condition.
pub fn run_designer<G: TextGenerator>(generator: &G, state: &AssessmentState) -> DesignOutput {
    let response = generate_or_empty(generator, "designer", PromptEngine::new().designer(state));
    parse_design(&response)
}

fn parse_design(text: &str) -> DesignOutput {
    let scale = first_capture(&SCALE_RE, text)
        .map(|block| parse_scale_lines(&block))
        .unwrap_or_default();
    if scale.is_empty() {
        warn!("designer response carried no usable scale items");
    }

    DesignOutput {
        title: first_capture(&NAME_RE, text).unwrap_or_else(|| TITLE_SENTINEL.to_string()),
        rationale: first_capture(&THOUGHTS_RE, text)
            .unwrap_or_else(|| RATIONALE_SENTINEL.to_string()),
        outline: first_capture(&OUTLINE_RE, text).unwrap_or_else(|| OUTLINE_SENTINEL.to_string()),
        scale,
    }
}

/// Parse the jsonl scale block, keeping item order and skipping lines that
/// are not valid items.
fn parse_scale_lines(block: &str) -> Vec<ScaleItem> {
    let mut items = Vec::new();
    for line in block.lines() {
        let line = line.trim();
        if !line.starts_with('{') {
            continue;
        }
        match serde_json::from_str::<ScaleItem>(line) {
            Ok(item) => items.push(item),
            Err(err) => warn!(error = %err, "skipping malformed scale line"),
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedGenerator, fresh_state};

    const RESPONSE: &str = r#"Name: The Glass Bridge

Thoughts: A traveler keeps judging each setback as total ruin.

Outline: 1. The bridge cracks; 2. The storm turns.

Scale Questions in Order:
{"question": "The bridge cracked. Is the journey ruined?", "options": {"yes": 1, "no": 0}}
not a json line
{"question": "The storm turned. Was the plan worthless?", "options": {"yes": 1, "no": 0}}
"#;

    #[test]
    fn parses_a_well_formed_design_response() {
        let output = parse_design(RESPONSE);
        assert_eq!(output.title, "The Glass Bridge");
        assert!(output.rationale.starts_with("A traveler"));
        assert!(output.outline.starts_with("1. The bridge cracks"));
        assert_eq!(output.scale.len(), 2);
        assert_eq!(output.scale[0].options.get(0).map(|o| o.score), Some(1));
    }

    #[test]
    fn malformed_response_degrades_to_sentinels_and_empty_scale() {
        let output = parse_design("nothing the parser recognizes");
        assert_eq!(output.title, TITLE_SENTINEL);
        assert_eq!(output.rationale, RATIONALE_SENTINEL);
        assert_eq!(output.outline, OUTLINE_SENTINEL);
        assert!(output.scale.is_empty());
    }

    #[test]
    fn bad_scale_lines_are_skipped_without_losing_order() {
        let block = "{\"question\": \"a\", \"options\": {\"y\": 1}}\n{broken\n{\"question\": \"b\", \"options\": {\"y\": 0}}";
        let items = parse_scale_lines(block);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].question, "a");
        assert_eq!(items[1].question, "b");
    }

    #[test]
    fn run_sends_one_designer_prompt() {
        let generator = ScriptedGenerator::new(vec![RESPONSE.to_string()]);
        let state = fresh_state();
        let output = run_designer(&generator, &state);
        assert_eq!(output.scale.len(), 2);
        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].agent, "designer");
        assert!(requests[0].prompt.contains("Scale Questions in Order:"));
    }
}
