//! Integration test suite for kit-deps
//!
//! End-to-end tests that drive the library through on-disk module indexes and
//! the `kit-deps` binary through `assert_cmd`.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **scanning**: reference collection over real directory trees
//! - **closure**: transitive resolution through a directory index
//! - **cli**: command output, exit codes and configuration precedence

mod cli;
mod closure;
mod scanning;
