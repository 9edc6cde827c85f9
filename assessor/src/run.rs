//! Full assessment run: design once, then play every scale item.

use std::fmt;

use anyhow::{Result, bail};
use tracing::info;

use crate::agents::designer::run_designer;
use crate::core::invariants::check_stable_state;
use crate::core::predicates::should_continue;
use crate::core::state::{AssessmentInputs, AssessmentState};
use crate::io::config::AssessorConfig;
use crate::io::generator::TextGenerator;
use crate::step::{ItemOutcome, play_item};

/// Fatal design error: the designer returned no usable scale, so no valid
/// run is possible. The only error class that crosses the run boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyScaleError;

impl fmt::Display for EmptyScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("design stage produced an empty scale; the run cannot proceed")
    }
}

impl std::error::Error for EmptyScaleError {}

/// Progress notifications emitted while a run executes.
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// The design stage completed and its scale was accepted.
    Designed {
        title: &'a str,
        outline: &'a str,
        items: usize,
    },
    /// One scale item was played and scored.
    ItemPlayed(&'a ItemOutcome),
}

/// Final result of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentOutcome {
    pub title: String,
    pub total_score: i64,
    pub item_scores: Vec<i64>,
    pub items_played: usize,
}

/// Run a complete assessment: one design stage, then one iteration per
/// scale item until the scale or the iteration ceiling is exhausted.
///
/// Degraded generation never fails the run; the only fatal condition is an
/// empty scale at design time (surfaced as [`EmptyScaleError`]).
pub fn run_assessment<G: TextGenerator, F: FnMut(&RunEvent<'_>)>(
    inputs: AssessmentInputs,
    config: &AssessorConfig,
    generator: &G,
    mut on_event: F,
) -> Result<AssessmentOutcome> {
    let mut state = AssessmentState::new(inputs);

    let design = run_designer(generator, &state);
    if design.scale.is_empty() {
        return Err(EmptyScaleError.into());
    }
    state.apply_design(design);
    info!(title = %state.title, items = state.scale.len(), "design accepted");
    on_event(&RunEvent::Designed {
        title: &state.title,
        outline: &state.outline,
        items: state.scale.len(),
    });

    while should_continue(
        state.item_index,
        state.scale.len(),
        config.max_player_iterations,
    ) {
        let outcome = play_item(&mut state, generator, config);
        let violations = check_stable_state(&state, config.max_player_iterations);
        if !violations.is_empty() {
            bail!(
                "state invariants violated after item {}:\n- {}",
                outcome.index,
                violations.join("\n- ")
            );
        }
        on_event(&RunEvent::ItemPlayed(&outcome));
    }

    let total_score = state.total_score();
    info!(total_score, items = state.item_index, "assessment complete");
    Ok(AssessmentOutcome {
        title: state.title,
        total_score,
        items_played: state.item_index,
        item_scores: state.scores,
    })
}
