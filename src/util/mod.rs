//! Shared utilities for `signal_catalog`.
//!
//! - Date/timestamp parsing and formatting (UTC)
//! - Monday week anchoring
//! - Output file writing

pub mod time;

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Write `contents` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file written.
pub fn write_output_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut body = contents.to_string();
    if !body.ends_with('\n') {
        body.push('\n');
    }
    fs::write(path, body)?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote output file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_output_file_creates_parents() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("reports").join("digest.md");

        write_output_file(&path, "# Signal Digest").expect("write");

        let written = fs::read_to_string(&path).expect("read back");
        assert_eq!(written, "# Signal Digest\n");
    }
}
