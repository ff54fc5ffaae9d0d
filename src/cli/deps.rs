//! List the modules a file, directory or module depends on.
//!
//! Without `--recursive` only modules named directly by kit includes are
//! listed. With it, the list is the full transitive closure through the
//! module index; a module never appears in its own closure.
//!
//! ```bash
//! kit-deps deps
//! kit-deps deps --recursive --module app
//! kit-deps deps vendor/ --format json
//! ```

use anyhow::Result;
use clap::Args;

use super::common::{OutputFormat, Target, TargetArgs, print_lines};
use crate::scanner::{ModuleSet, Scanner};

/// Command to list module dependencies.
#[derive(Args, Debug)]
pub struct DepsCommand {
    #[command(flatten)]
    target: TargetArgs,

    /// Follow dependencies transitively through the module index
    #[arg(short, long)]
    recursive: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl DepsCommand {
    /// Compute and print the dependency set.
    pub async fn execute(self, scanner: &Scanner) -> Result<()> {
        let target = self.target.target();
        let deps = if self.recursive {
            target.recursive_dependencies(scanner).await?
        } else {
            target.dependencies(scanner).await?
        };

        match self.format {
            OutputFormat::Text => print_lines(&deps),
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&to_json(&target, self.recursive, &deps))?);
            }
        }
        Ok(())
    }
}

fn to_json(target: &Target, recursive: bool, deps: &ModuleSet) -> serde_json::Value {
    serde_json::json!({
        "root": target.label(),
        "recursive": recursive,
        "dependencies": deps,
    })
}
