use std::path::Path;

/// Create a directory and any missing parents. A directory that already
/// exists is not an error.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path)
}
