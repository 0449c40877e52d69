//! Persisting the serialized chart.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Extension of the serialized chart file.
pub const OUTPUT_EXTENSION: &str = "xml";

/// Errors that can occur while writing the chart file.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to create '{}': {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Derive the output path from the input path by swapping the extension.
///
/// `images/heart.png` becomes `images/heart.xml`.
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_EXTENSION)
}

/// Write `contents` to `path`, replacing any existing file.
///
/// The data goes to a temporary file in the target directory first and is
/// renamed into place, so a failure never leaves a partial file behind.
///
/// The rename replaces `path` itself: an existing symlink is replaced by a
/// regular file instead of being written through, and the new file always
/// gets mode 0644 on unix regardless of the old file's permissions.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), OutputError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let create_err = |source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    };
    let write_err = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(create_err)?;
    file.write_all(contents).map_err(write_err)?;
    file.flush().map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }

    file.persist(path).map_err(|e| write_err(e.error))?;
    log::info!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
