use std::path::{Path, PathBuf};

/// Walk up from `start` looking for a file named `filename`.
/// Returns the path to the directory containing the file, or `None`.
pub fn find_ancestor_with(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(filename);
        if candidate.is_file() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Read a file to a string, mapping failures to a document error that names the path.
pub fn read_document(path: &Path) -> Result<String, crate::errors::BlockyardError> {
    std::fs::read_to_string(path).map_err(|e| crate::errors::BlockyardError::Document {
        message: format!("Failed to read {}: {e}", path.display()),
    })
}
