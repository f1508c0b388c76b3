//! Error handling for lockage.
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`LockageError`]) so each stage of the
//!    pipeline can decide precisely which failures are fatal and which
//!    degrade gracefully.
//! 2. **User-friendly messages** with actionable suggestions for the two
//!    fatal categories that actually reach the terminal.
//!
//! # Taxonomy
//!
//! | Variant | Severity | Handling |
//! |---------|----------|----------|
//! | [`LockageError::LockfileRead`] | fatal | abort, nonzero exit, no report |
//! | [`LockageError::LockfileParse`] | fatal | abort, nonzero exit, no report |
//! | [`LockageError::MalformedResolution`] | fatal | abort; indicates a corrupt or unsupported lockfile |
//! | [`LockageError::RegistryFetch`] | recovered | package left unenriched, run continues |
//! | [`LockageError::CacheRead`] | recovered silently | treated as a cache miss |
//! | [`LockageError::CacheWrite`] | recovered silently | only affects the next run's hit rate |
//!
//! Registry and cache variants never cross the enrichment boundary; they are
//! logged at debug level and swallowed there. Only the lockfile variants
//! propagate to `main`, where [`user_friendly_error`] turns them into a
//! single diagnostic with a suggestion.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for lockage operations.
#[derive(Error, Debug)]
pub enum LockageError {
    /// The lockfile is missing or unreadable.
    #[error("Failed to read lockfile {path}")]
    LockfileRead {
        /// Path that was attempted
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The lockfile was read but could not be decoded.
    #[error("Invalid lockfile syntax in {path}: {reason}")]
    LockfileParse {
        /// Path to the lockfile that failed to decode
        path: String,
        /// Specific reason for the decode failure
        reason: String,
    },

    /// A resolution string has no name/version separator.
    ///
    /// Resolution strings encode `<name>@<version-or-protocol-spec>`. A
    /// missing separator means the lockfile is corrupt or uses a format
    /// this tool does not understand, so the whole run aborts rather than
    /// silently skipping the entry.
    #[error("Malformed resolution '{resolution}': no name/version separator")]
    MalformedResolution {
        /// The offending resolution string
        resolution: String,
    },

    /// A registry request failed (network error, non-2xx, undecodable body).
    #[error("Registry request for '{name}' failed: {reason}")]
    RegistryFetch {
        /// Package whose metadata could not be fetched
        name: String,
        /// Reason for the failure
        reason: String,
    },

    /// A cache entry could not be read or decoded.
    #[error("Failed to read cache entry for '{name}': {reason}")]
    CacheRead {
        /// Package whose cache entry is unusable
        name: String,
        /// Reason for the failure
        reason: String,
    },

    /// A cache entry could not be written.
    #[error("Failed to write cache entry for '{name}': {reason}")]
    CacheWrite {
        /// Package whose cache entry could not be persisted
        name: String,
        /// Reason for the failure
        reason: String,
    },

    /// Configuration problem (unusable cache directory, bad registry URL).
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },
}

/// An error paired with optional user-facing guidance.
///
/// Wraps the underlying failure with a suggestion and details so the binary
/// can print one coherent diagnostic instead of a bare error chain.
pub struct ErrorContext {
    /// The underlying error
    pub error: anyhow::Error,
    /// A short, actionable suggestion for resolving the problem
    pub suggestion: Option<String>,
    /// Additional background details
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no suggestion or details.
    pub fn new(error: anyhow::Error) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion shown beneath the error message.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach background details shown beneath the error message.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the diagnostic to stderr with color.
    pub fn display(&self) {
        eprintln!("{} {}", "Error:".red().bold(), self.error);

        for cause in self.error.chain().skip(1) {
            eprintln!("  {} {}", "Caused by:".dimmed(), cause);
        }

        if let Some(details) = &self.details {
            eprintln!("\n{details}");
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("\n{} {}", "Suggestion:".yellow(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with a contextual suggestion.
///
/// Recognizes the fatal [`LockageError`] variants and attaches guidance for
/// each; everything else passes through unchanged.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let suggestion = match error.downcast_ref::<LockageError>() {
        Some(LockageError::LockfileRead { .. }) => Some(
            "Run lockage from a directory containing a yarn.lock, or pass the \
             lockfile path as an argument"
                .to_string(),
        ),
        Some(LockageError::LockfileParse { .. }) => Some(
            "Only Yarn berry (v2+) lockfiles are supported; regenerate the \
             lockfile with `yarn install` if it is corrupt"
                .to_string(),
        ),
        Some(LockageError::MalformedResolution { .. }) => Some(
            "The lockfile contains a resolution entry this tool cannot parse; \
             it may be corrupt or produced by an unsupported Yarn version"
                .to_string(),
        ),
        _ => None,
    };

    let ctx = ErrorContext::new(error);
    match suggestion {
        Some(s) => ctx.with_suggestion(s),
        None => ctx,
    }
}
