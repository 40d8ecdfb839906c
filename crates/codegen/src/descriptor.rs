//! Module descriptor model and loader. A descriptor is the declarative half
//! of a module: its runtime-selectable alias, the generated type's name, and
//! the ordered configuration schema the synthesizer turns into source code.

use crate::error::ForgeError;
use crate::fsio;
use fxhash::FxHashSet;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use strum_macros::Display;

/// Semantic type tag of a configuration item, mapped onto the generated C++.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display)]
pub enum ItemKind {
    #[serde(rename = "int")]
    #[strum(serialize = "int")]
    Int,
    #[serde(rename = "scalar")]
    #[strum(serialize = "scalar")]
    Scalar,
    #[serde(rename = "flag")]
    #[strum(serialize = "flag")]
    Flag,
    #[serde(rename = "string")]
    #[strum(serialize = "string")]
    Str,
    #[serde(rename = "list")]
    #[strum(serialize = "list")]
    List,
    #[serde(rename = "nested-object")]
    #[strum(serialize = "nested-object")]
    NestedObject,
}

impl ItemKind {
    /// C++ member type for this kind.
    #[must_use]
    pub const fn cpp_type(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Scalar => "double",
            Self::Flag => "bool",
            Self::Str => "std::string",
            Self::List => "std::vector<double>",
            Self::NestedObject => "nlohmann::json",
        }
    }

    /// Only numeric items can serve as termination criteria.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Scalar)
    }

    /// printf conversion used by the synthesized termination report.
    #[must_use]
    pub const fn printf_spec(self) -> &'static str {
        match self {
            Self::Int => "%d",
            _ => "%f",
        }
    }

    fn default_matches(self, value: &Value) -> bool {
        match self {
            Self::Int | Self::Scalar => value.is_number(),
            Self::Flag => value.is_boolean(),
            Self::Str => value.is_string(),
            Self::List => value.is_array(),
            Self::NestedObject => value.is_object(),
        }
    }
}

/// One entry of a module's configuration schema.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Kind")]
    pub kind: ItemKind,
    #[serde(rename = "Default")]
    pub default: Option<Value>,
    /// Criterion items are read into a stored target and compared against
    /// the member's current value by the synthesized termination check.
    #[serde(rename = "Termination Criterion", default)]
    pub termination_criterion: bool,
}

/// Declarative description of one module, loaded fresh on every build.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDescriptor {
    #[serde(rename = "Alias")]
    pub alias: String,
    #[serde(rename = "Target Type Name")]
    pub target_type_name: String,
    /// Order is significant: it determines declaration order in the output.
    #[serde(rename = "Configuration Items", default)]
    pub configuration_items: Vec<ConfigItem>,
}

/// Parses and validates a module descriptor file.
///
/// # Errors
/// Returns [`ForgeError::DescriptorParse`] if the file is malformed, a
/// required field is missing or empty, an item name is duplicated, a
/// default's JSON type contradicts its kind, or a non-numeric item is
/// flagged as a termination criterion. A missing file surfaces as
/// [`ForgeError::Io`]; directories without a descriptor never reach this
/// loader (discovery skips them).
pub fn load(path: &Path) -> Result<ModuleDescriptor, ForgeError> {
    let text = fsio::read_file(path)?;
    let descriptor: ModuleDescriptor =
        serde_json::from_str(&text).map_err(|e| ForgeError::parse(path, e.to_string()))?;
    validate(&descriptor, path)?;
    Ok(descriptor)
}

fn validate(descriptor: &ModuleDescriptor, path: &Path) -> Result<(), ForgeError> {
    if descriptor.alias.trim().is_empty() {
        return Err(ForgeError::parse(path, "'Alias' must not be empty"));
    }
    if descriptor.target_type_name.trim().is_empty() {
        return Err(ForgeError::parse(path, "'Target Type Name' must not be empty"));
    }

    let mut seen = FxHashSet::default();
    for item in &descriptor.configuration_items {
        if item.name.trim().is_empty() {
            return Err(ForgeError::parse(path, "configuration item with empty 'Name'"));
        }
        if !seen.insert(item.name.as_str()) {
            return Err(ForgeError::parse(
                path,
                format!("duplicate configuration item '{}'", item.name),
            ));
        }
        if item.termination_criterion && !item.kind.is_numeric() {
            return Err(ForgeError::parse(
                path,
                format!(
                    "termination criterion '{}' must be of kind 'int' or 'scalar', not '{}'",
                    item.name, item.kind
                ),
            ));
        }
        if let Some(default) = &item.default
            && !item.kind.default_matches(default)
        {
            return Err(ForgeError::parse(
                path,
                format!("default for '{}' does not match kind '{}'", item.name, item.kind),
            ));
        }
    }

    Ok(())
}
