//! Prompt rendering for the content generators.
//!
//! Templates live next to this module as markdown files and are compiled in
//! with `include_str!`. Each render function pulls the fields it needs from a
//! read-only view of the assessment state.

use anyhow::Result;
use minijinja::{Environment, context};

use crate::core::state::AssessmentState;

const DESIGNER_TEMPLATE: &str = include_str!("prompts/designer.md");
const NARRATOR_OPENING_TEMPLATE: &str = include_str!("prompts/narrator_opening.md");
const NARRATOR_CONTINUE_TEMPLATE: &str = include_str!("prompts/narrator_continue.md");
const CRITIC_TEMPLATE: &str = include_str!("prompts/critic.md");
const SIMULATOR_TEMPLATE: &str = include_str!("prompts/simulator.md");

/// Template engine wrapper around minijinja.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_template("designer", DESIGNER_TEMPLATE)
            .expect("designer template should be valid");
        env.add_template("narrator_opening", NARRATOR_OPENING_TEMPLATE)
            .expect("narrator opening template should be valid");
        env.add_template("narrator_continue", NARRATOR_CONTINUE_TEMPLATE)
            .expect("narrator continue template should be valid");
        env.add_template("critic", CRITIC_TEMPLATE)
            .expect("critic template should be valid");
        env.add_template("simulator", SIMULATOR_TEMPLATE)
            .expect("simulator template should be valid");
        Self { env }
    }

    pub fn designer(&self, state: &AssessmentState) -> Result<String> {
        self.render(
            "designer",
            context! {
                genre => state.genre,
                topic => state.topic,
                construct => state.construct,
                scale_payload => state.scale_payload.trim(),
            },
        )
    }

    pub fn narrator_opening(&self, state: &AssessmentState) -> Result<String> {
        self.render(
            "narrator_opening",
            context! {
                title => state.title,
                outline => state.outline,
                scale_item => current_item_json(state),
            },
        )
    }

    pub fn narrator_continue(&self, state: &AssessmentState) -> Result<String> {
        self.render(
            "narrator_continue",
            context! {
                title => state.title,
                outline => state.outline,
                progress_percent => format!("{:.1}", state.progress * 100.0),
                memory => state.memory,
                previous_paragraph => state.previous_paragraph,
                chosen_instruction => state.chosen_instruction,
                scale_item => current_item_json(state),
            },
        )
    }

    pub fn critic(&self, state: &AssessmentState) -> Result<String> {
        self.render(
            "critic",
            context! {
                memory => state.memory,
                previous_paragraph => state.previous_paragraph,
                chosen_instruction => state.chosen_instruction,
                current_question => state.current_question,
                paragraph => state.current_paragraph,
                instructions => state.instructions,
            },
        )
    }

    pub fn simulator(&self, state: &AssessmentState) -> Result<String> {
        self.render(
            "simulator",
            context! {
                construct => state.construct,
                memory => state.memory,
                previous_paragraph => state.previous_paragraph,
                paragraph => state.current_paragraph,
                instructions => state.instructions,
            },
        )
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON form of the scale item at the cursor, `{}` when the cursor has run
/// past the scale.
fn current_item_json(state: &AssessmentState) -> String {
    state
        .current_item()
        .and_then(|item| serde_json::to_string(item).ok())
        .unwrap_or_else(|| "{}".to_string())
}
