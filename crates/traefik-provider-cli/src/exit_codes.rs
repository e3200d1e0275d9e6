//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - invalid configuration, type name or import identifier
pub const VALIDATION_ERROR: i32 = 2;

/// API error - GET/PATCH/DELETE failed, object missing or wait timed out
pub const API_ERROR: i32 = 3;

/// State error - state file missing, unreadable or for another type
pub const STATE_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Cluster access unavailable - offline mode or no usable kubeconfig
pub const UNAVAILABLE: i32 = 69;
