//! Error handling for kit-deps
//!
//! This module provides the error types and user-friendly error reporting used
//! by the scanner and the CLI. The error system follows two principles:
//! 1. **Strongly-typed errors** so callers can tell failure kinds apart
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`KitError`] - Enumerated error types for every failure of a scan
//! - [`ErrorContext`] - Wrapper that adds user-facing suggestions and details
//!
//! Library functions return [`anyhow::Result`] and raise [`KitError`] values
//! through `?`. Callers that need to react to a specific kind downcast:
//!
//! ```rust,no_run
//! use kit_deps::core::KitError;
//!
//! fn is_unresolved(err: &anyhow::Error) -> bool {
//!     matches!(err.downcast_ref::<KitError>(), Some(KitError::UnresolvedModule { .. }))
//! }
//! ```
//!
//! Use [`user_friendly_error`] to convert any error into an [`ErrorContext`]
//! for display.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for kit-deps operations.
///
/// Every variant aborts the operation that raised it. There is no partial
/// result and no retry: a dependency set computed while skipping a failure
/// would look complete while being wrong.
#[derive(Error, Debug)]
pub enum KitError {
    /// A source file could not be opened or read.
    ///
    /// Raised by the reference collector; aborts the whole collection for the
    /// file or directory being scanned.
    #[error("Failed to read source file: {path}")]
    FileReadError {
        /// The file that could not be read
        path: String,
        /// The underlying I/O failure
        reason: String,
    },

    /// A kit include line whose reference cannot be delimited.
    ///
    /// The line starts with `#` and contains `kit/`, but there is no `>`
    /// closing the reference after the marker, or the reference is empty.
    #[error("Malformed kit include: {line}")]
    MalformedInclude {
        /// The offending source line
        line: String,
    },

    /// The module index has no entry for a module name.
    ///
    /// Raised when resolving a module directly or while expanding the
    /// transitive closure.
    #[error("Module '{name}' not found in module index")]
    UnresolvedModule {
        /// The module name that could not be resolved
        name: String,
    },

    /// Source traversal failed for a directory tree.
    #[error("Failed to list sources under: {path}")]
    TraversalError {
        /// The directory being traversed
        path: String,
        /// Why traversal failed
        reason: String,
    },

    /// The configured module index root does not exist.
    #[error("Module index not found: {path}")]
    IndexNotFound {
        /// The configured index root
        path: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for KitError {
    fn clone(&self) -> Self {
        match self {
            Self::FileReadError {
                path,
                reason,
            } => Self::FileReadError {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::MalformedInclude {
                line,
            } => Self::MalformedInclude {
                line: line.clone(),
            },
            Self::UnresolvedModule {
                name,
            } => Self::UnresolvedModule {
                name: name.clone(),
            },
            Self::TraversalError {
                path,
                reason,
            } => Self::TraversalError {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::IndexNotFound {
                path,
            } => Self::IndexNotFound {
                path: path.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // io::Error is not Clone; keep kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            // toml::de::Error is not Clone either
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error wrapper carrying user-facing guidance.
///
/// Wraps a [`KitError`] with an optional suggestion (what to do) and optional
/// details (why it happened). Displayed by the CLI on stderr.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: KitError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: KitError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Known [`KitError`] kinds get a tailored suggestion. I/O and TOML errors
/// found anywhere in the chain are mapped to their closest kind. Everything
/// else becomes [`KitError::Other`] carrying the full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(kit_error) = error.downcast_ref::<KitError>() {
        let mut ctx = create_error_context(kit_error.clone());
        // Keep outer context (e.g. "while scanning module 'foo'") visible
        let outer: Vec<String> = error
            .chain()
            .take_while(|cause| cause.downcast_ref::<KitError>().is_none())
            .map(ToString::to_string)
            .collect();
        if !outer.is_empty() && ctx.details.is_none() {
            ctx.details = Some(outer.join(": "));
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorContext::new(KitError::Other {
                message: error.to_string(),
            })
            .with_suggestion("Check file ownership and permissions of the scanned tree"),
            std::io::ErrorKind::NotFound => ErrorContext::new(KitError::Other {
                message: error.to_string(),
            })
            .with_suggestion("Check that the file or directory exists and the path is correct"),
            _ => ErrorContext::new(KitError::Other {
                message: error.to_string(),
            }),
        };
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(KitError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of your kit-deps configuration file");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(KitError::Other {
        message,
    })
}

fn create_error_context(error: KitError) -> ErrorContext {
    match &error {
        KitError::FileReadError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check that the file exists and is readable, then re-run the scan")
        }
        KitError::MalformedInclude {
            ..
        } => ErrorContext::new(error)
            .with_details("A kit include must look like '#include <kit/module/file.h>' or '#include <kit/file.h>'")
            .with_suggestion("Close the include with '>' or remove the 'kit/' marker from the line"),
        KitError::UnresolvedModule {
            name,
        } => {
            let suggestion = format!(
                "Install module '{name}' into the module index, or point --index at the index that contains it"
            );
            ErrorContext::new(error)
                .with_details("Every module referenced by a kit include must be present in the module index")
                .with_suggestion(suggestion)
        }
        KitError::TraversalError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check that the directory exists and all sub-directories are readable")
        }
        KitError::IndexNotFound {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Create the index directory or set it with --index, KIT_INDEX or the 'index' config key",
        ),
        KitError::ConfigError {
            ..
        }
        | KitError::TomlError(_) => ErrorContext::new(error)
            .with_suggestion("Check the kit-deps configuration file (~/.kit/config.toml or KIT_CONFIG)"),
        KitError::IoError(_)
        | KitError::Other {
            ..
        } => ErrorContext::new(error),
    }
}
