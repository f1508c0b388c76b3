//! Core types shared across the lockage pipeline.
//!
//! Currently this is the error taxonomy ([`LockageError`]) and the
//! user-facing error presentation helpers used by the binary entry point.

pub mod error;

pub use error::{ErrorContext, LockageError, user_friendly_error};
