//! Command-line interface for kit-deps.
//!
//! # Available Commands
//!
//! - `refs` - list the normalized kit references of a file, directory or module
//! - `deps` - list direct or transitive module dependencies
//! - `tree` - print the module dependency tree and any cycles
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - log level (`debug` / `error`, default `warn`);
//!   `RUST_LOG` takes precedence when set
//! - `--config <FILE>` - configuration file (else `KIT_CONFIG`, else
//!   `~/.kit/config.toml`)
//! - `--index <DIR>` - module index root (else `KIT_INDEX`, else the config)
//! - `--max-parallel <N>` - bound on concurrent reads and module scans
//!
//! Results go to stdout and logs to stderr, so output can be piped.
//!
//! # Example
//!
//! ```bash
//! kit-deps deps --recursive
//! kit-deps --index ./vendor/kit refs --module net --format json
//! kit-deps -v tree --module app
//! ```

mod common;
mod deps;
mod refs;
mod tree;

pub use common::{CommandContext, OutputFormat, Target, TargetArgs};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::KitConfig;
use crate::constants::{CONFIG_ENV_VAR, INDEX_ENV_VAR};

/// Runtime configuration derived from global flags and the environment.
///
/// Environment lookups happen once, in [`Cli::build_config`], so tests can
/// construct this directly without touching process state.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Explicit configuration file from `--config`.
    pub config_path: Option<PathBuf>,

    /// Value of `KIT_CONFIG`, if set.
    pub config_env: Option<String>,

    /// Module index root from `--index`.
    pub index: Option<PathBuf>,

    /// Value of `KIT_INDEX`, if set.
    pub index_env: Option<String>,

    /// Parallelism from `--max-parallel`.
    pub max_parallel: Option<usize>,
}

impl CliConfig {
    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` wins over [`log_level`](Self::log_level). Calling this more
    /// than once is harmless.
    pub fn init_logging(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load the configuration file and build the command context.
    pub async fn context(&self) -> Result<CommandContext> {
        let config =
            KitConfig::load_with_optional(self.config_path.clone(), self.config_env.clone()).await?;
        CommandContext::new(
            &config,
            self.index.as_deref(),
            self.index_env.as_deref(),
            self.max_parallel,
        )
    }
}

/// Find the kit modules C/C++ sources depend on.
#[derive(Parser, Debug)]
#[command(
    name = "kit-deps",
    about = "Discover kit module dependencies of C/C++ sources",
    version,
    long_about = "kit-deps scans #include <kit/...> directives in C/C++ sources and resolves \
                  which kit modules a file, directory or module depends on, directly or \
                  transitively, without compiling anything."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Module index root directory
    #[arg(long, global = true, value_name = "DIR")]
    index: Option<PathBuf>,

    /// Maximum number of concurrent file reads and module scans
    #[arg(long, global = true, value_name = "N")]
    max_parallel: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the kit references declared by sources
    Refs(refs::RefsCommand),

    /// List the kit modules sources depend on
    Deps(deps::DepsCommand),

    /// Show the module dependency tree
    Tree(tree::TreeCommand),
}

impl Cli {
    /// Execute the CLI with configuration read from flags and the environment.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate global flags and environment variables into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
            config_env: std::env::var(CONFIG_ENV_VAR).ok(),
            index: self.index.clone(),
            index_env: std::env::var(INDEX_ENV_VAR).ok(),
            max_parallel: self.max_parallel,
        }
    }

    /// Execute the CLI with an injected configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();
        let ctx = config.context().await?;

        match self.command {
            Commands::Refs(cmd) => cmd.execute(&ctx.scanner).await,
            Commands::Deps(cmd) => cmd.execute(&ctx.scanner).await,
            Commands::Tree(cmd) => cmd.execute(&ctx.scanner).await,
        }
    }
}
