//! # mforge-codegen
//!
//! Build-time source generator for descriptor-driven plugin modules.
//! A module-kind root directory holds one subdirectory per module; each
//! subdirectory carries a JSON descriptor (alias, target type name,
//! configuration schema) and a hand-authored template pair. The generator
//! synthesizes member declarations, configuration apply/read-back code and
//! termination checks, merges them into the templates, and rewrites the
//! shared base files with one dispatch entry per module.
//!
//! Regeneration is incremental: a module's output pair is rewritten only
//! when a template or the descriptor is at least as fresh as the existing
//! output (or, in digest mode, when the recorded input digest no longer
//! matches). The aggregate base files are rewritten on every build.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mforge_codegen::{run_build, BuildOptions};
//!
//! let report = run_build("source/conduits".as_ref(), &BuildOptions::default()).unwrap();
//! println!("{} generated, {} up to date", report.generated.len(), report.up_to_date.len());
//! ```

pub mod build;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod gate;
pub mod registry;
pub mod synth;
pub mod template;

mod fsio;

pub use crate::build::{BuildOptions, BuildReport, ModuleSummary, check, run_build, survey};
pub use crate::descriptor::{ConfigItem, ItemKind, ModuleDescriptor};
pub use crate::discovery::ModuleDir;
pub use crate::error::ForgeError;
pub use crate::gate::GateMode;
pub use crate::registry::{DispatchEntry, RegistryTable};
pub use crate::synth::Fragments;
pub use crate::template::TemplatePair;
