//! Build orchestration. Threads one explicit context through discovery →
//! loader → synthesizer → assembler/gate → aggregator: no global state, one
//! module's generation strictly precedes its dispatch entry, and the build
//! aborts on the first fatal error, before the aggregate rewrite.

use crate::descriptor;
use crate::discovery;
use crate::error::ForgeError;
use crate::fsio;
use crate::gate::{self, GateMode, ModuleInputs};
use crate::registry::{self, DispatchEntry, RegistryTable};
use crate::synth;
use crate::template::TemplatePair;
use std::path::Path;
use tracing::{debug, info};

/// Options for one build invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub gate: GateMode,
}

/// What a build did, per module — the verifiable record that an up-to-date
/// module saw no filesystem write.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Aliases whose output pair was (re)generated.
    pub generated: Vec<String>,
    /// Aliases left untouched by the gate.
    pub up_to_date: Vec<String>,
    /// The final dispatch table, in serialization order.
    pub entries: Vec<DispatchEntry>,
}

/// A discovered module's descriptor facts, as listed by `survey`.
#[derive(Debug, Clone)]
pub struct ModuleSummary {
    pub folder: String,
    pub alias: String,
    pub target_type_name: String,
    pub item_count: usize,
}

/// Runs a full build over one module-kind root: regenerates every stale
/// module pair and rewrites the base files from the aggregate table.
///
/// # Errors
/// Any [`ForgeError`] aborts the whole build; there is no partial-success
/// mode. Per-module outputs written before the failing module remain on
/// disk, but the aggregate base files are only rewritten after every module
/// succeeded.
pub fn run_build(root: &Path, options: &BuildOptions) -> Result<BuildReport, ForgeError> {
    let modules = discovery::discover(root)?;
    debug!("Discovered {} module(s) under '{}'", modules.len(), root.display());

    let mut table = RegistryTable::default();
    let mut report = BuildReport::default();

    for module in &modules {
        let descriptor = descriptor::load(&module.descriptor_path)?;
        let templates = TemplatePair::load(&module.path, &module.name)?;

        let inputs = ModuleInputs {
            descriptor: &module.descriptor_path,
            decl_template: &templates.decl_path,
            impl_template: &templates.impl_path,
        };
        let digest = gate::input_digest(inputs)?;

        let decl_out = module.path.join(format!("{}.hpp", module.name));
        let impl_out = module.path.join(format!("{}.cpp", module.name));

        if gate::needs_regeneration(options.gate, inputs, &decl_out, &impl_out, &digest)? {
            let fragments = synth::synthesize(&descriptor);
            let decl_text = templates.assemble_declaration(&digest, &fragments.declarations)?;
            let impl_text = templates.assemble_implementation(&digest, &fragments);

            fsio::write_atomic(&decl_out, &decl_text)?;
            fsio::write_atomic(&impl_out, &impl_text)?;

            info!("Created '{}'", decl_out.display());
            info!("Created '{}'", impl_out.display());
            report.generated.push(descriptor.alias.clone());
        } else {
            debug!("Module '{}' is up to date", descriptor.alias);
            report.up_to_date.push(descriptor.alias.clone());
        }

        table.insert(DispatchEntry {
            alias: descriptor.alias,
            target_type_name: descriptor.target_type_name,
            module_path: module.path.clone(),
        })?;
    }

    registry::write_base_files(root, &table)?;
    report.entries = table.into_sorted_entries();

    Ok(report)
}

/// Validates the whole module-kind root without writing anything:
/// descriptors parse, templates exist, markers occur exactly once, aliases
/// are unique. Returns the number of modules checked.
///
/// # Errors
/// The same taxonomy as [`run_build`], with no filesystem effects.
pub fn check(root: &Path) -> Result<usize, ForgeError> {
    let modules = discovery::discover(root)?;
    let mut table = RegistryTable::default();

    for module in &modules {
        let descriptor = descriptor::load(&module.descriptor_path)?;
        let templates = TemplatePair::load(&module.path, &module.name)?;

        let fragments = synth::synthesize(&descriptor);
        templates.assemble_declaration("", &fragments.declarations)?;

        table.insert(DispatchEntry {
            alias: descriptor.alias,
            target_type_name: descriptor.target_type_name,
            module_path: module.path.clone(),
        })?;
    }

    registry::render_base_files(root, &table)?;

    Ok(modules.len())
}

/// Lists the discovered modules with their descriptor facts, in registry
/// order.
///
/// # Errors
/// Returns [`ForgeError::Io`] if the root cannot be read and
/// [`ForgeError::DescriptorParse`] for malformed descriptors.
pub fn survey(root: &Path) -> Result<Vec<ModuleSummary>, ForgeError> {
    let modules = discovery::discover(root)?;

    let mut summaries = Vec::with_capacity(modules.len());
    for module in &modules {
        let descriptor = descriptor::load(&module.descriptor_path)?;
        summaries.push(ModuleSummary {
            folder: module.name.clone(),
            alias: descriptor.alias,
            target_type_name: descriptor.target_type_name,
            item_count: descriptor.configuration_items.len(),
        });
    }

    Ok(summaries)
}
