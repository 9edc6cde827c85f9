//! Pure, deterministic assessment logic.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod invariants;
pub mod predicates;
pub mod scorer;
pub mod state;
pub mod types;
