// Reading the target document and writing it back.
use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Truncate and rewrite the file in place.
    #[default]
    Direct,
    /// Write a sibling temp file, then rename it over the target.
    Atomic,
}

pub fn load_document(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(path, &text)
}

/// Parse already-read text; `path` only labels the error.
pub fn parse_document(path: &Path, text: &str) -> Result<Value> {
    // tolerate a UTF-8 BOM left by some editors
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    serde_json::from_str(text).map_err(|source| Error::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_document(path: &Path, contents: &str, mode: WriteMode) -> Result<()> {
    let write_err = |source: std::io::Error| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    match mode {
        WriteMode::Direct => fs::write(path, contents).map_err(write_err)?,
        WriteMode::Atomic => {
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            // dropped (and deleted) on any early return below
            let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
            debug!(temp = %tmp.path().display(), "writing temp file");
            if let Ok(meta) = fs::metadata(path) {
                tmp.as_file().set_permissions(meta.permissions()).map_err(write_err)?;
            }
            tmp.write_all(contents.as_bytes()).map_err(write_err)?;
            tmp.as_file().sync_all().map_err(write_err)?;
            tmp.persist(path).map_err(|e| write_err(e.error))?;
        }
    }
    info!(file = %path.display(), ?mode, bytes = contents.len(), "document written");
    Ok(())
}
