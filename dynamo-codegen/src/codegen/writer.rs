//! Output file writing

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;

/// Write `text` to `path`, creating parent directories and overwriting any
/// existing file. Not atomic: a crash mid-write can leave a partial file.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating folder {}", parent.display());
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/models.rs");

        write_output(&path, "pub struct A;\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "pub struct A;\n");
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crud.rs");
        fs::write(&path, "old contents that are longer").unwrap();

        write_output(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = write_output(&blocker.join("models.rs"), "x").unwrap_err();
        assert!(matches!(err, crate::error::CodegenError::IoError(_)));
    }
}
