//! Core types for kit-deps
//!
//! This module holds the error types shared by every layer of the crate:
//! - [`KitError`] - Enumerated error types covering every scan failure
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to user-friendly format
//!
//! # Error Handling Pattern
//!
//! ```rust
//! use kit_deps::core::{KitError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn resolve() -> Result<()> {
//!     Err(KitError::UnresolvedModule { name: "zlib".to_string() }.into())
//! }
//!
//! if let Err(e) = resolve() {
//!     let friendly = user_friendly_error(e);
//!     assert!(friendly.suggestion.is_some());
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, KitError, user_friendly_error};
