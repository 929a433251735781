//! Exit code constants for the promptvault CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, missing files, bad config)
//! - 2: Template failure (parse errors, render contract violations)
//! - 3: Snapshot integrity failure (hash mismatch, unreadable records)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, missing paths, invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Template failure: unknown variables, bad conditionals, missing or unused variables.
pub const TEMPLATE_FAILURE: i32 = 2;

/// Snapshot integrity failure: tampered, malformed or missing snapshot records.
pub const INTEGRITY_FAILURE: i32 = 3;
