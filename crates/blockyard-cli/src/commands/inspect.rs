//! Handler for `blockyard inspect`.

use std::path::Path;

use miette::Result;

use blockyard_core::document::DocumentFormat;
use blockyard_ops::{ops_inspect, ops_load};

use super::output_format;

pub fn exec(start: &Path, format: Option<DocumentFormat>) -> Result<()> {
    let workspace = ops_load::load(start)?;
    let rendered = ops_inspect::inspect_workspace(&workspace, output_format(format))?;
    print!("{rendered}");
    Ok(())
}
