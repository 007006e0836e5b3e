//! Handler for `blockyard blocks`.

use std::path::Path;

use miette::Result;

use blockyard_ops::{ops_inspect, ops_load, ops_tree};

use super::output_format;
use crate::cli::BlocksAction;

pub fn exec(start: &Path, action: BlocksAction) -> Result<()> {
    let workspace = ops_load::load(start)?;
    match action {
        BlocksAction::List => {
            let blocks = ops_inspect::list(&workspace);
            if blocks.is_empty() {
                println!("No blocks in workspace.");
                return Ok(());
            }
            for block in blocks {
                let mut line = block.name.clone();
                if !block.version.is_empty() {
                    line.push_str(&format!(" v{}", block.version));
                }
                if !block.from.is_empty() {
                    line.push_str(&format!(" (from {})", block.from));
                }
                if block.template {
                    line.push_str(" [template]");
                }
                println!("{line}: {} action(s)", block.actions);
            }
            Ok(())
        }
        BlocksAction::Inspect { name, format } => {
            let rendered = ops_inspect::inspect_block(&workspace, &name, output_format(format))?;
            print!("{rendered}");
            Ok(())
        }
        BlocksAction::Chain { name } => {
            for (i, node) in ops_tree::chain(&workspace, &name)?.iter().enumerate() {
                let indent = "  ".repeat(i);
                println!("{indent}{node}");
            }
            Ok(())
        }
    }
}
