//! Display the module dependency tree, similar to `cargo tree`.
//!
//! # Output Format
//!
//! ```text
//! app
//! ├── log
//! │   └── str
//! └── net
//!     └── log (*)
//!
//! (*) = already shown
//! ```
//!
//! Groups of modules that reach each other are reported after the tree as
//! `cycle: a, b, c`.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::collections::BTreeSet;

use super::common::{Target, TargetArgs};
use crate::graph::{DependencyGraph, DependencyNode};
use crate::scanner::Scanner;

/// Command to display a dependency tree.
#[derive(Args, Debug)]
pub struct TreeCommand {
    #[command(flatten)]
    target: TargetArgs,
}

impl TreeCommand {
    /// Build the graph for the target and print it.
    pub async fn execute(self, scanner: &Scanner) -> Result<()> {
        let graph = match self.target.target() {
            Target::Module(name) => DependencyGraph::for_module(scanner, &name).await?,
            Target::File(path) => DependencyGraph::for_file(scanner, &path).await?,
            Target::Directory(path) => DependencyGraph::for_directory(scanner, &path).await?,
        };
        let Some(root) = graph.root() else {
            return Ok(());
        };

        let rendered = graph.to_tree_string(root);
        print!("{rendered}");
        if rendered.contains("(*)") {
            println!();
            println!("{}", "(*) = already shown".dimmed());
        }

        let cycles = graph.cycles();
        if !cycles.is_empty() {
            println!();
            println!("{}", "Dependency cycles:".yellow().bold());
            for cycle in &cycles {
                println!("  {}", format_cycle(cycle));
            }
        }
        Ok(())
    }
}

/// One strongly connected group of modules. Members reach each other through
/// some path, not necessarily a direct edge.
fn format_cycle(cycle: &BTreeSet<DependencyNode>) -> String {
    let names: Vec<&str> = cycle.iter().map(DependencyNode::name).collect();
    format!("cycle: {}", names.join(", "))
}
