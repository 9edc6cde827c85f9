//! Shape invariants of the assessment state at stable points.
//!
//! Checked between item iterations. A violation means a controller bug, not
//! degraded model output; degraded output is absorbed upstream by sentinel
//! substitution.

use crate::core::predicates::total_items;
use crate::core::state::AssessmentState;

/// Check the state after an item completed and `advance` ran.
///
/// Returns human-readable violations; empty means the state is sound.
pub fn check_stable_state(state: &AssessmentState, max_player_iterations: usize) -> Vec<String> {
    let mut errors = Vec::new();

    if state.scores.len() != state.item_index {
        errors.push(format!(
            "ledger out of step: {} scores recorded for {} completed items",
            state.scores.len(),
            state.item_index
        ));
    }

    if state.instructions.len() != 2 {
        errors.push(format!(
            "instruction pair has {} entries, expected 2",
            state.instructions.len()
        ));
    }

    if state.critic_iteration != 0 {
        errors.push(format!(
            "critic counter not reset after advance (still {})",
            state.critic_iteration
        ));
    }

    let total = total_items(state.scale.len(), max_player_iterations);
    if state.item_index > total {
        errors.push(format!(
            "item index {} exceeds total items {}",
            state.item_index, total
        ));
    }

    if !(0.0..=1.0).contains(&state.progress) {
        errors.push(format!("progress {} outside [0, 1]", state.progress));
    }

    errors
}
