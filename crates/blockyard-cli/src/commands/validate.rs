//! Handler for `blockyard validate`.

use std::path::Path;

use miette::Result;

use blockyard_ops::ops_load;

pub fn exec(start: &Path) -> Result<()> {
    let workspace = ops_load::load_unchecked(start)?;
    let report = ops_load::check(&workspace);
    if !report.is_empty() {
        blockyard_util::progress::status_warn(
            "Invalid",
            &format!("{} violation(s) found", report.len()),
        );
        report.into_result()?;
    }
    blockyard_util::progress::status(
        "Valid",
        &format!("{} block(s), no violations", workspace.registry.len()),
    );
    Ok(())
}
