//! Handler for `blockyard actions`.

use std::path::Path;

use miette::Result;

use blockyard_core::document::render;
use blockyard_ops::{ops_actions, ops_load};

use super::output_format;
use crate::cli::ActionsAction;

pub fn exec(start: &Path, action: ActionsAction) -> Result<()> {
    let workspace = ops_load::load(start)?;
    match action {
        ActionsAction::List { block } => {
            let entries = ops_actions::list(&workspace, block.as_deref())?;
            if entries.is_empty() {
                println!("No actions found.");
                return Ok(());
            }
            let mut current = "";
            for entry in &entries {
                if entry.block != current {
                    println!("{}:", entry.block);
                    current = &entry.block;
                }
                if entry.description.is_empty() {
                    println!("  {}", entry.action);
                } else {
                    println!("  {:<20} {}", entry.action, entry.description);
                }
            }
            Ok(())
        }
        ActionsAction::Plan {
            block,
            action,
            format,
        } => {
            let plan = ops_actions::plan(&workspace, &block, &action)?;
            print!("{}", render(&plan, output_format(format))?);
            Ok(())
        }
    }
}
