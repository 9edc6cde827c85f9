//! Interactive-fiction psychometric assessment engine.
//!
//! This crate turns a self-report scale into a playable interactive story: a
//! designer agent converts the scale into a game blueprint, a narrator writes
//! each scene around the current scale item, a critic refines the scene, and a
//! simulated player picks one of two instructions. The chosen branch is scored
//! positionally against the item's options. The architecture enforces a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (state updates, loop predicates,
//!   scoring). No I/O, fully testable in isolation.
//! - **[`agents`]**: Prompt construction and response parsing for each agent
//!   role. Parsing is total: malformed output degrades to sentinels.
//! - **[`io`]**: Side-effecting operations (configuration, scale files,
//!   process-backed text generation, transcripts).
//!
//! Orchestration modules ([`step`], [`run`]) coordinate core logic with the
//! agents to play a full assessment.

pub mod agents;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
pub mod step;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
