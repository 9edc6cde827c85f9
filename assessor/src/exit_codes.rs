//! Stable exit codes for assessor CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid config/scale/arguments or other errors.
pub const INVALID: i32 = 1;
/// `assessor run` aborted because the design stage produced an empty scale.
pub const DESIGN_FAILED: i32 = 2;
