//! Writing rendered documents to disk

use crate::error::{LatexlabError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `content` to `path` atomically
///
/// Refuses to replace an existing file unless `overwrite` is set. Missing
/// parent directories are created. The content goes to a temp file in the
/// target directory first and is then persisted over `path`, so readers
/// never observe a half-written document.
pub fn write_document(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(LatexlabError::OutputExists {
            path: path.to_path_buf(),
        });
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote document");
    Ok(())
}
