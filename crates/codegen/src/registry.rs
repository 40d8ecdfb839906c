//! Dispatch aggregation. Every discovered module contributes one
//! `(alias, target type)` entry; the table is serialized into the shared
//! `base.cpp` as alias→factory registry entries replacing the dispatch
//! marker, and `base.hpp` is copied through. Both base outputs are rewritten
//! on every build, regardless of per-module staleness — only the per-module
//! pair is gated.

use crate::error::ForgeError;
use crate::fsio;
use crate::template::{self, DISPATCH_MARKER};
use fxhash::FxHashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One module's contribution to the dispatch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    pub alias: String,
    pub target_type_name: String,
    /// Module directory, reported when an alias collides.
    pub module_path: PathBuf,
}

/// Ordered collection of dispatch entries with fail-fast alias uniqueness.
#[derive(Debug, Default)]
pub struct RegistryTable {
    entries: Vec<DispatchEntry>,
    index: FxHashMap<String, usize>,
}

impl RegistryTable {
    /// Adds one module's entry.
    ///
    /// # Errors
    /// Returns [`ForgeError::DuplicateAlias`] naming both module directories
    /// if the alias is already taken; competing dispatch entries must never
    /// reach the generated table.
    pub fn insert(&mut self, entry: DispatchEntry) -> Result<(), ForgeError> {
        if let Some(&first) = self.index.get(&entry.alias) {
            return Err(ForgeError::DuplicateAlias {
                alias: entry.alias,
                first: self.entries[first].module_path.clone(),
                second: entry.module_path,
            });
        }
        self.index.insert(entry.alias.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by alias — the serialization order of the table.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<&DispatchEntry> {
        let mut sorted: Vec<&DispatchEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.alias.cmp(&b.alias));
        sorted
    }

    /// Consumes the table, yielding entries in serialization order.
    #[must_use]
    pub fn into_sorted_entries(mut self) -> Vec<DispatchEntry> {
        self.entries.sort_by(|a, b| a.alias.cmp(&b.alias));
        self.entries
    }

    /// Renders the registry initializer entries that replace the dispatch
    /// marker. The hand-authored base template owns the surrounding map
    /// declaration; the factory lambdas convert through it.
    #[must_use]
    pub fn render_dispatch(&self) -> String {
        let lines: Vec<String> = self
            .sorted_entries()
            .iter()
            .map(|entry| {
                format!(
                    "{{ \"{}\", []() {{ return new {}(); }} }},",
                    entry.alias, entry.target_type_name
                )
            })
            .collect();
        lines.join("\n ")
    }
}

/// Renders the two base outputs from their templates and the table, without
/// touching the filesystem beyond reads.
///
/// # Errors
/// Returns [`ForgeError::MissingTemplate`] if a base template is absent,
/// [`ForgeError::Marker`] if `base._cpp` does not contain the dispatch
/// marker exactly once, and [`ForgeError::Io`] on read failure.
pub(crate) fn render_base_files(
    root: &Path,
    table: &RegistryTable,
) -> Result<(String, String), ForgeError> {
    let decl_template = root.join("base._hpp");
    let impl_template = root.join("base._cpp");

    for path in [&decl_template, &impl_template] {
        if !path.is_file() {
            return Err(ForgeError::MissingTemplate { path: path.clone() });
        }
    }

    let decl_text = fsio::read_file(&decl_template)?;
    let impl_text = fsio::read_file(&impl_template)?;

    let dispatch = table.render_dispatch();
    let new_impl = template::replace_marker(&impl_text, DISPATCH_MARKER, &dispatch, &impl_template)?;

    let banner = template::banner();
    Ok((format!("{banner}{decl_text}"), format!("{banner}{new_impl}")))
}

/// Rewrites the shared base files from the aggregate table. Unconditional:
/// there is no staleness gate for the aggregate outputs.
///
/// # Errors
/// Same taxonomy as [`render_base_files`], plus [`ForgeError::Io`] on write
/// failure.
pub fn write_base_files(root: &Path, table: &RegistryTable) -> Result<(), ForgeError> {
    let (decl_out, impl_out) = render_base_files(root, table)?;

    fsio::write_atomic(&root.join("base.hpp"), &decl_out)?;
    fsio::write_atomic(&root.join("base.cpp"), &impl_out)?;

    debug!("Rewrote base files with {} dispatch entries", table.len());

    Ok(())
}
