//! Shared pieces of the CLI commands: the scan target, output formats and the
//! command context built from global options.

use anyhow::{Result, bail};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::config::KitConfig;
use crate::index::DirectoryIndex;
use crate::scanner::{ModuleSet, ReferenceSet, Scanner, derive_modules};

/// Output format for commands that print sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One item per line, sorted.
    #[default]
    Text,

    /// A single JSON object on stdout.
    Json,
}

/// What a command scans: a path or an indexed module.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Source file or directory to scan (defaults to the current directory)
    #[arg(value_name = "PATH", conflicts_with = "module")]
    pub path: Option<PathBuf>,

    /// Scan an indexed module instead of a path
    #[arg(short, long, value_name = "NAME")]
    pub module: Option<String>,
}

/// Resolved scan target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single source file.
    File(PathBuf),
    /// A directory tree of sources.
    Directory(PathBuf),
    /// A module looked up through the index.
    Module(String),
}

impl TargetArgs {
    /// Resolve the arguments to a concrete target.
    pub fn target(&self) -> Target {
        if let Some(name) = &self.module {
            return Target::Module(name.clone());
        }
        let path = self.path.clone().unwrap_or_else(|| PathBuf::from("."));
        if path.is_file() {
            Target::File(path)
        } else {
            Target::Directory(path)
        }
    }
}

impl Target {
    /// Label used as `root` in command output.
    pub fn label(&self) -> String {
        match self {
            Self::File(path) | Self::Directory(path) => path.display().to_string(),
            Self::Module(name) => name.clone(),
        }
    }

    /// References declared by this target.
    pub async fn references(&self, scanner: &Scanner) -> Result<ReferenceSet> {
        match self {
            Self::File(path) => scanner.file_references(path).await,
            Self::Directory(path) => scanner.directory_references(path).await,
            Self::Module(name) => scanner.module_references(name).await,
        }
    }

    /// Direct module dependencies of this target.
    pub async fn dependencies(&self, scanner: &Scanner) -> Result<ModuleSet> {
        match self {
            Self::File(path) => Ok(derive_modules(&scanner.file_references(path).await?)),
            Self::Directory(path) => scanner.directory_dependencies(path).await,
            Self::Module(name) => scanner.module_dependencies(name).await,
        }
    }

    /// Transitive module dependencies of this target.
    pub async fn recursive_dependencies(&self, scanner: &Scanner) -> Result<ModuleSet> {
        match self {
            Self::File(_) => {
                let seed = self.dependencies(scanner).await?;
                scanner.transitive_closure(seed).await
            }
            Self::Directory(path) => scanner.recursive_dependencies(path).await,
            Self::Module(name) => scanner.recursive_module_dependencies(name).await,
        }
    }
}

/// Everything a command needs to run: the module index in effect and a
/// scanner over it.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Module index root in effect.
    pub index_root: PathBuf,
    /// Scanner bound to the index and the configured source filter.
    pub scanner: Scanner,
}

impl CommandContext {
    /// Build a context from a loaded configuration and command-line overrides.
    pub fn new(
        config: &KitConfig,
        index_flag: Option<&Path>,
        index_env: Option<&str>,
        max_parallel: Option<usize>,
    ) -> Result<Self> {
        if max_parallel == Some(0) {
            bail!("--max-parallel must be at least 1");
        }

        let index_root = config.index_root(index_flag, index_env)?;
        let index = DirectoryIndex::open(&index_root)?;
        let parallelism = config.max_parallel(max_parallel);
        debug!("Using module index {} with parallelism {}", index_root.display(), parallelism);

        let scanner = Scanner::new(Arc::new(index), Arc::new(config.source_filter()))
            .with_max_parallel(parallelism);

        Ok(Self {
            index_root,
            scanner,
        })
    }
}

/// Print a sorted set one item per line.
pub fn print_lines<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) {
    for item in items {
        println!("{item}");
    }
}
