//! Path-context file I/O. Writes go through a temporary file in the target
//! directory followed by a rename, so a failed write never leaves an output
//! that looks fresher than its inputs.

use crate::error::ForgeError;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

pub(crate) fn read_file(path: &Path) -> Result<String, ForgeError> {
    fs::read_to_string(path).map_err(|e| ForgeError::io(path, e))
}

pub(crate) fn mtime(path: &Path) -> Result<SystemTime, ForgeError> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| ForgeError::io(path, e))
}

pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), ForgeError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".mforge-")
        .tempfile_in(dir)
        .map_err(|e| ForgeError::io(path, e))?;

    tmp.write_all(contents.as_bytes()).map_err(|e| ForgeError::io(path, e))?;
    tmp.as_file().sync_all().map_err(|e| ForgeError::io(path, e))?;
    tmp.persist(path).map_err(|e| ForgeError::io(path, e.error))?;

    Ok(())
}
