//! Handler for `blockyard tree`.

use std::path::Path;

use miette::Result;

use blockyard_ops::{ops_load, ops_tree};

pub fn exec(start: &Path) -> Result<()> {
    let workspace = ops_load::load(start)?;
    print!("{}", ops_tree::tree(&workspace));
    Ok(())
}
