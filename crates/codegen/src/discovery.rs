//! Module discovery: enumerates candidate subdirectories one level below a
//! module-kind root. A candidate is accepted only if it carries a descriptor
//! named after its directory; everything else is skipped with a diagnostic,
//! which keeps non-module directories (models, data) tolerable in the tree.

use crate::error::ForgeError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A discovered module directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDir {
    /// The module's subdirectory.
    pub path: PathBuf,
    /// Directory name; descriptor, templates and outputs share this stem.
    pub name: String,
    /// `<path>/<name>.json`.
    pub descriptor_path: PathBuf,
}

/// Enumerates module directories under `root`, sorted by directory name so
/// the downstream registry is reproducible regardless of filesystem order.
///
/// # Errors
/// Returns [`ForgeError::Io`] if the root cannot be read. A subdirectory
/// without a descriptor is not an error; it is skipped with a warning.
pub fn discover(root: &Path) -> Result<Vec<ModuleDir>, ForgeError> {
    let entries = fs::read_dir(root).map_err(|e| ForgeError::io(root, e))?;

    let mut modules = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ForgeError::io(root, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
            warn!("Skipping '{}': directory name is not valid UTF-8", path.display());
            continue;
        };

        let descriptor_path = path.join(format!("{name}.json"));
        if descriptor_path.is_file() {
            modules.push(ModuleDir { path, name, descriptor_path });
        } else {
            warn!("Skipping '{}': no module descriptor '{name}.json'", path.display());
        }
    }

    modules.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(modules)
}
