//! Global constants used throughout the kit-deps codebase.
//!
//! This module contains the include marker, default source extensions,
//! parallelism parameters and well-known file names. Defining them centrally
//! keeps the scanner, configuration and CLI in agreement.

/// Marker that identifies a kit include inside a `#` preprocessor line.
///
/// The raw reference starts immediately after the first occurrence of this
/// marker, e.g. `#include <kit/module/file.h>` yields `module/file.h`.
pub const KIT_INCLUDE_MARKER: &str = "kit/";

/// Character that opens a preprocessor directive.
pub const DIRECTIVE_PREFIX: char = '#';

/// Character that terminates a kit include reference.
pub const INCLUDE_TERMINATOR: char = '>';

/// Separator between the module name and the module-relative path.
pub const REFERENCE_SEPARATOR: char = '/';

/// Source file extensions scanned when no configuration overrides them.
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["c", "h", "cc", "cpp", "cxx", "hh", "hpp", "hxx"];

/// Minimum number of parallel operations regardless of CPU count.
///
/// File reads are I/O bound, so even single-core machines benefit from a
/// handful of concurrent reads.
pub const MIN_PARALLELISM: usize = 10;

/// Multiplier applied to CPU core count for default parallelism.
pub const PARALLELISM_CORE_MULTIPLIER: usize = 2;

/// Name of the directory under the user's home that holds kit state.
pub const KIT_HOME_DIR: &str = ".kit";

/// Name of the module index directory inside [`KIT_HOME_DIR`].
pub const MODULE_INDEX_DIR: &str = "modules";

/// Name of the global configuration file inside [`KIT_HOME_DIR`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "KIT_CONFIG";

/// Environment variable overriding the module index root.
pub const INDEX_ENV_VAR: &str = "KIT_INDEX";

/// Default parallelism: `max(MIN_PARALLELISM, cores * PARALLELISM_CORE_MULTIPLIER)`.
pub fn default_max_parallel() -> usize {
    let cores = std::thread::available_parallelism().map(std::num::NonZeroUsize::get).unwrap_or(1);
    (cores * PARALLELISM_CORE_MULTIPLIER).max(MIN_PARALLELISM)
}
