//! Private per-upload copy of the statement. The copy is removed when the
//! guard drops, on success and failure alike.

use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

pub struct Staged {
    file: NamedTempFile,
}

impl Staged {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Copy `source` into a uniquely named temp file carrying `extension`.
pub fn stage(source: &Path, extension: &str) -> Result<Staged> {
    let suffix = format!(".{extension}");
    let mut file = tempfile::Builder::new()
        .prefix("utrsync-")
        .suffix(&suffix)
        .tempfile()
        .context("create staging file")?;

    let mut input = File::open(source).with_context(|| format!("open {}", source.display()))?;
    io::copy(&mut input, file.as_file_mut()).with_context(|| format!("stage {}", source.display()))?;
    Ok(Staged { file })
}
