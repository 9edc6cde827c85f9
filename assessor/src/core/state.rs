//! The single mutable record threaded through every assessment stage.

use crate::core::types::{
    ChoiceOutput, CritiqueOutput, DesignOutput, NarrationOutput, ScaleItem, instruction_pair,
};

/// The four initial inputs of an assessment run. Immutable once the run
/// starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentInputs {
    /// Psychological construct under test (e.g. "all_or_nothing").
    pub construct: String,
    /// Raw line-delimited JSON scale payload, quoted verbatim in the design
    /// prompt.
    pub scale_payload: String,
    /// Narrative genre (e.g. "Fantasy").
    pub genre: String,
    /// Narrative topic within the genre (e.g. "Adventure").
    pub topic: String,
}

/// Mutable run state. The controller in [`crate::run`] and [`crate::step`] is
/// its sole mutator; generators receive a shared reference and return deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentState {
    // Identity, set once at construction.
    pub construct: String,
    pub scale_payload: String,
    pub genre: String,
    pub topic: String,

    // Design outputs, written once by the design stage.
    pub title: String,
    pub rationale: String,
    pub outline: String,
    pub scale: Vec<ScaleItem>,

    // Narrative cursor.
    pub previous_paragraph: String,
    pub current_paragraph: String,
    /// Bounded running summary of the story so far.
    pub memory: String,
    /// Question+options snapshot captured on the opening narration.
    pub current_question: String,
    /// Pending instruction pair, index-aligned with the current item's
    /// options.
    pub instructions: Vec<String>,
    /// Instruction the player is currently acting on.
    pub chosen_instruction: String,

    // Scoring ledger.
    pub scores: Vec<i64>,
    pub selected_index: usize,

    // Control counters.
    pub item_index: usize,
    pub critic_iteration: u32,
    /// Completed items over total items, in `[0, 1]`.
    pub progress: f64,
}

impl AssessmentState {
    pub fn new(inputs: AssessmentInputs) -> Self {
        Self {
            construct: inputs.construct,
            scale_payload: inputs.scale_payload,
            genre: inputs.genre,
            topic: inputs.topic,
            title: String::new(),
            rationale: String::new(),
            outline: String::new(),
            scale: Vec::new(),
            previous_paragraph: String::new(),
            current_paragraph: String::new(),
            memory: String::new(),
            current_question: String::new(),
            instructions: Vec::new(),
            chosen_instruction: String::new(),
            scores: Vec::new(),
            selected_index: 0,
            item_index: 0,
            critic_iteration: 0,
            progress: 0.0,
        }
    }

    /// The scale item currently being played, if any.
    pub fn current_item(&self) -> Option<&ScaleItem> {
        self.scale.get(self.item_index)
    }

    /// True while the opening narration (two setup paragraphs) is pending.
    pub fn is_opening(&self) -> bool {
        self.item_index == 0
    }

    pub fn total_score(&self) -> i64 {
        self.scores.iter().sum()
    }

    /// Apply the design stage result. Callers must reject an empty scale
    /// before applying; this only records the fields.
    pub fn apply_design(&mut self, output: DesignOutput) {
        self.title = output.title;
        self.rationale = output.rationale;
        self.outline = output.outline;
        self.scale = output.scale;
    }

    /// Apply a narration delta. The opening call also establishes the
    /// previous paragraph and the question snapshot.
    pub fn apply_narration(&mut self, output: NarrationOutput) {
        if let Some(previous) = output.previous_paragraph {
            self.previous_paragraph = previous;
        }
        if let Some(question) = output.question {
            self.current_question = question;
        }
        self.current_paragraph = output.paragraph;
        self.memory = output.memory;
        self.instructions = instruction_pair(output.instructions);
    }

    /// Apply a critic delta in place and count the pass. `None` fields leave
    /// the current content untouched.
    pub fn apply_critique(&mut self, output: CritiqueOutput) {
        if let Some(paragraph) = output.paragraph {
            self.current_paragraph = paragraph;
        }
        if let Some(memory) = output.memory {
            self.memory = memory;
        }
        if let Some(instructions) = output.instructions {
            self.instructions = instruction_pair(instructions);
        }
        self.critic_iteration += 1;
    }

    /// Record the simulated player's choice, clamping a stray index back to
    /// the first instruction.
    pub fn record_choice(&mut self, output: ChoiceOutput) {
        self.selected_index = if output.index < self.instructions.len() {
            output.index
        } else {
            0
        };
        self.chosen_instruction = output.instruction;
    }

    pub fn record_score(&mut self, score: i64) {
        self.scores.push(score);
    }

    /// Close out the current item: bump the index, recompute progress, roll
    /// the paragraph window forward, and reset the critic counter.
    pub fn advance(&mut self, total_items: usize) {
        self.item_index += 1;
        self.progress = if total_items == 0 {
            1.0
        } else {
            self.item_index as f64 / total_items as f64
        };
        self.previous_paragraph = self.current_paragraph.clone();
        self.critic_iteration = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::INSTRUCTION_SENTINELS;
    use crate::test_support::{inputs, yes_no_item};

    fn designed_state() -> AssessmentState {
        let mut state = AssessmentState::new(inputs());
        state.apply_design(DesignOutput {
            title: "The Bridge".to_string(),
            rationale: "rationale".to_string(),
            outline: "1. cross".to_string(),
            scale: vec![yes_no_item("Did you cross?"), yes_no_item("Did you stay?")],
        });
        state
    }

    #[test]
    fn opening_narration_sets_previous_paragraph_and_question() {
        let mut state = designed_state();
        state.apply_narration(NarrationOutput {
            previous_paragraph: Some("p1".to_string()),
            paragraph: "p2".to_string(),
            memory: "m".to_string(),
            instructions: vec!["go".to_string(), "stay".to_string()],
            question: Some("Did you cross? yes/no".to_string()),
        });
        assert_eq!(state.previous_paragraph, "p1");
        assert_eq!(state.current_paragraph, "p2");
        assert_eq!(state.current_question, "Did you cross? yes/no");
        assert_eq!(state.instructions.len(), 2);
    }

    #[test]
    fn subsequent_narration_keeps_question_snapshot() {
        let mut state = designed_state();
        state.current_question = "first snapshot".to_string();
        state.apply_narration(NarrationOutput {
            previous_paragraph: None,
            paragraph: "p3".to_string(),
            memory: "m2".to_string(),
            instructions: vec!["a".to_string(), "b".to_string()],
            question: None,
        });
        assert_eq!(state.current_question, "first snapshot");
        assert_eq!(state.current_paragraph, "p3");
    }

    #[test]
    fn short_instruction_list_is_replaced_by_sentinels() {
        let mut state = designed_state();
        state.apply_narration(NarrationOutput {
            previous_paragraph: None,
            paragraph: "p".to_string(),
            memory: "m".to_string(),
            instructions: vec!["only one".to_string()],
            question: None,
        });
        assert_eq!(state.instructions, INSTRUCTION_SENTINELS.to_vec());
    }

    #[test]
    fn critique_applies_only_replaced_fields_and_counts_the_pass() {
        let mut state = designed_state();
        state.current_paragraph = "draft".to_string();
        state.memory = "memory".to_string();
        state.instructions = vec!["a".to_string(), "b".to_string()];

        state.apply_critique(CritiqueOutput {
            paragraph: Some("polished".to_string()),
            memory: None,
            instructions: None,
        });

        assert_eq!(state.current_paragraph, "polished");
        assert_eq!(state.memory, "memory");
        assert_eq!(state.instructions, vec!["a", "b"]);
        assert_eq!(state.critic_iteration, 1);
    }

    #[test]
    fn record_choice_clamps_out_of_range_index() {
        let mut state = designed_state();
        state.instructions = vec!["a".to_string(), "b".to_string()];
        state.record_choice(ChoiceOutput {
            instruction: "a".to_string(),
            index: 5,
        });
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn advance_moves_the_cursor_and_resets_the_critic_counter() {
        let mut state = designed_state();
        state.current_paragraph = "latest".to_string();
        state.critic_iteration = 2;
        state.record_score(1);

        state.advance(2);

        assert_eq!(state.item_index, 1);
        assert_eq!(state.previous_paragraph, "latest");
        assert_eq!(state.critic_iteration, 0);
        assert!((state.progress - 0.5).abs() < f64::EPSILON);
    }
}
