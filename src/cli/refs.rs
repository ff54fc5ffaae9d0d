//! List the kit references declared by a file, directory or module.
//!
//! ```bash
//! kit-deps refs                      # current directory
//! kit-deps refs src/main.c           # one file
//! kit-deps refs --module log         # an indexed module
//! kit-deps refs --format json
//! ```

use anyhow::Result;
use clap::Args;

use super::common::{OutputFormat, Target, TargetArgs, print_lines};
use crate::scanner::{ReferenceSet, Scanner};

/// Command to list normalized kit references.
#[derive(Args, Debug)]
pub struct RefsCommand {
    #[command(flatten)]
    target: TargetArgs,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl RefsCommand {
    /// Scan the target and print its references.
    pub async fn execute(self, scanner: &Scanner) -> Result<()> {
        let target = self.target.target();
        let refs = target.references(scanner).await?;

        match self.format {
            OutputFormat::Text => print_lines(&refs),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&to_json(&target, &refs))?),
        }
        Ok(())
    }
}

fn to_json(target: &Target, refs: &ReferenceSet) -> serde_json::Value {
    serde_json::json!({
        "root": target.label(),
        "references": refs,
    })
}
