use std::path::PathBuf;
use thiserror::Error;

/// Error taxonomy of the generator. Every variant names the offending path;
/// all of them abort the build before the aggregate base files are rewritten.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The descriptor file exists but its structure is invalid.
    #[error("Malformed module descriptor '{}': {message}", .path.display())]
    DescriptorParse { path: PathBuf, message: String },

    /// A hand-authored template half is absent; the module cannot be generated.
    #[error("Missing template '{}'", .path.display())]
    MissingTemplate { path: PathBuf },

    /// The insertion marker occurred zero or multiple times in a template.
    #[error("Template '{}' must contain the marker '{marker}' exactly once (found {found})", .path.display())]
    Marker { path: PathBuf, marker: String, found: usize },

    /// Two modules declared the same runtime-selectable alias.
    #[error("Duplicate module alias '{alias}' declared by '{}' and '{}'", .first.display(), .second.display())]
    DuplicateAlias { alias: String, first: PathBuf, second: PathBuf },

    /// Read/write/permission failure with full path context.
    #[error("I/O failure on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ForgeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DescriptorParse { path: path.into(), message: message.into() }
    }
}
