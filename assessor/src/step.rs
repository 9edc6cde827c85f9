//! One scale-item iteration: narrate, refine, simulate, score, advance.

use serde::Serialize;
use tracing::{debug, info};

use crate::agents::critic::run_critic;
use crate::agents::narrator::run_narrator;
use crate::agents::simulator::run_simulator;
use crate::core::predicates::{should_refine, total_items};
use crate::core::scorer::score_selection;
use crate::core::state::AssessmentState;
use crate::io::config::AssessorConfig;
use crate::io::generator::TextGenerator;

/// Record of one completed item iteration.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemOutcome {
    /// 0-based index of the scale item that was played.
    pub index: usize,
    /// Question text of that item (empty past the end of the scale).
    pub question: String,
    /// Instruction pair the player chose from.
    pub instructions: Vec<String>,
    /// Critic passes actually run for this item.
    pub critic_passes: u32,
    /// 0-based index of the chosen instruction.
    pub selected_index: usize,
    pub chosen_instruction: String,
    pub score: i64,
    /// Overall progress after this item, in `[0, 1]`.
    pub progress: f64,
}

/// Play the scale item at the state's cursor.
///
/// Total over degraded generator output: sentinel substitution upstream
/// keeps every stage shape-valid, so this never fails, it falls back to
/// the first branch where generation fell apart.
pub fn play_item<G: TextGenerator>(
    state: &mut AssessmentState,
    generator: &G,
    config: &AssessorConfig,
) -> ItemOutcome {
    let index = state.item_index;

    debug!(index, "narrating item");
    let narration = run_narrator(generator, state);
    state.apply_narration(narration);

    while should_refine(state.critic_iteration, config.max_critic_iterations) {
        debug!(index, pass = state.critic_iteration + 1, "refining item");
        let critique = run_critic(generator, state);
        state.apply_critique(critique);
    }
    let critic_passes = state.critic_iteration;

    let choice = run_simulator(generator, state);
    state.record_choice(choice);

    let score = score_selection(state.current_item(), state.selected_index);
    state.record_score(score);

    let question = state
        .current_item()
        .map(|item| item.question.clone())
        .unwrap_or_default();
    let instructions = state.instructions.clone();
    let selected_index = state.selected_index;
    let chosen_instruction = state.chosen_instruction.clone();

    let total = total_items(state.scale.len(), config.max_player_iterations);
    state.advance(total);

    info!(index, score, progress = state.progress, "item completed");

    ItemOutcome {
        index,
        question,
        instructions,
        critic_passes,
        selected_index,
        chosen_instruction,
        score,
        progress: state.progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::AssessorConfig;
    use crate::test_support::{
        SCRIPTED_INSTRUCTIONS, ScriptedGenerator, critic_ok_response, designed_state,
        opening_narration_response, simulator_picks,
    };

    #[test]
    fn one_item_runs_narrate_refine_simulate_score_advance() {
        let generator = ScriptedGenerator::new(vec![
            opening_narration_response(),
            critic_ok_response(),
            critic_ok_response(),
            simulator_picks(0),
        ]);
        let mut state = designed_state();
        let config = AssessorConfig::default();

        let outcome = play_item(&mut state, &generator, &config);

        assert_eq!(outcome.index, 0);
        assert_eq!(outcome.critic_passes, 2);
        assert_eq!(outcome.selected_index, 0);
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.instructions, SCRIPTED_INSTRUCTIONS.to_vec());
        assert!((outcome.progress - 0.5).abs() < f64::EPSILON);

        assert_eq!(state.item_index, 1);
        assert_eq!(state.scores, vec![1]);
        assert_eq!(state.critic_iteration, 0);
        assert_eq!(generator.requests_for("narrator").len(), 1);
        assert_eq!(generator.requests_for("critic").len(), 2);
        assert_eq!(generator.requests_for("simulator").len(), 1);
    }

    #[test]
    fn zero_critic_config_skips_refinement_entirely() {
        let generator =
            ScriptedGenerator::new(vec![opening_narration_response(), simulator_picks(1)]);
        let mut state = designed_state();
        let config = AssessorConfig {
            max_critic_iterations: 0,
            ..AssessorConfig::default()
        };

        let outcome = play_item(&mut state, &generator, &config);

        assert_eq!(outcome.critic_passes, 0);
        assert_eq!(outcome.selected_index, 1);
        assert_eq!(outcome.score, 0);
        assert!(generator.requests_for("critic").is_empty());
    }

    #[test]
    fn configured_cap_above_the_ceiling_is_clamped_to_two() {
        let generator = ScriptedGenerator::new(vec![
            opening_narration_response(),
            critic_ok_response(),
            critic_ok_response(),
            critic_ok_response(),
            simulator_picks(0),
        ]);
        let mut state = designed_state();
        let config = AssessorConfig {
            max_critic_iterations: 50,
            ..AssessorConfig::default()
        };

        let outcome = play_item(&mut state, &generator, &config);

        assert_eq!(outcome.critic_passes, 2);
        assert_eq!(generator.requests_for("critic").len(), 2);
    }

    #[test]
    fn degraded_narration_still_scores_and_advances() {
        // Only narration arrives; critic and simulator calls fail dry.
        let generator = ScriptedGenerator::new(vec![opening_narration_response()]);
        let mut state = designed_state();
        let config = AssessorConfig::default();

        let outcome = play_item(&mut state, &generator, &config);

        // Simulator fallback picks index 0, which scores 1 on a yes/no item.
        assert_eq!(outcome.selected_index, 0);
        assert_eq!(outcome.score, 1);
        assert_eq!(state.scores.len(), 1);
        assert_eq!(state.instructions.len(), 2);
    }
}
