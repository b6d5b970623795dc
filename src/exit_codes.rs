//! Exit code constants for the dsconfig CLI.
//!
//! - 0: Success
//! - 1: User error (bad arguments, malformed values, type mismatches)
//! - 2: Requested key is not set
//! - 3: Configuration backend failure (git config, filesystem)
//! - 4: Value is unknown and cannot be asked for

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unknown scopes, or values that fail coercion.
pub const USER_ERROR: i32 = 1;

/// The requested key does not exist in the merged view.
pub const KEY_NOT_FOUND: i32 = 2;

/// The backing store (git config subprocess or filesystem) reported a failure.
pub const BACKEND_FAILURE: i32 = 3;

/// The value is not configured and there is no way to ask for it.
pub const UNRESOLVABLE: i32 = 4;
