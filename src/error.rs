//! # Error Handling
//!
//! Centralized error type for the `repo-import` library, built on
//! `thiserror`. Each variant carries the contextual fields a caller needs to
//! produce a useful message: the offending pattern text, the provider id
//! that failed to resolve, the underlying cause of a step failure.
//!
//! Step *validation* findings (warnings and blocking errors surfaced while a
//! wizard step is still being edited) are deliberately not part of this
//! enum; they are ordinary values returned by `WizardEngine::validate` (see
//! `crate::wizard::ValidationMessage`). This enum covers failures that abort
//! an operation outright.

use thiserror::Error;

/// Main error type for repo-import operations
#[derive(Error, Debug)]
pub enum Error {
    /// A user-supplied repository name pattern failed to compile.
    ///
    /// Carries the offending pattern text and the regex engine's own
    /// diagnostic so the user can see exactly what to fix.
    #[error("Invalid regular expression `{pattern}` due to: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A wizard step's `execute` could not complete.
    ///
    /// Includes the rendered underlying cause when one is available.
    #[error("Step execution failed: {message}{}", cause.as_ref().map(|c| format!(" (caused by: {})", c)).unwrap_or_default())]
    ExecutionFailure {
        message: String,
        /// Underlying cause, if any
        cause: Option<String>,
    },

    /// The remote provider could not list repositories for an organization.
    #[error("Repository listing failed for {organization}: {message}")]
    Listing {
        organization: String,
        message: String,
    },

    /// A provider id did not resolve against the registry.
    #[error("Unknown provider `{id}` (known providers: {known})")]
    ProviderNotFound { id: String, known: String },

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
