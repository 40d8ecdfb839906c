use anyhow::{Context, Result};
use mforge_codegen::{BuildOptions, GateMode, run_build};
use std::path::Path;

/// Runs a full generation pass over one module-kind root.
///
/// # Result
/// Returns `Ok(())` after printing a build summary.
///
/// # Errors
/// Returns an error if discovery, descriptor parsing, template assembly or
/// any file write fails; the build aborts on the first fatal error.
pub fn generate_modules(root: &Path, digest: bool) -> Result<()> {
    let options = BuildOptions {
        gate: if digest { GateMode::Digest } else { GateMode::Timestamp },
    };

    let report = run_build(root, &options)
        .with_context(|| format!("Module generation failed for '{}'", root.display()))?;

    println!(
        "✅ Generated {} module(s), {} up to date, {} dispatch entr{}.",
        report.generated.len(),
        report.up_to_date.len(),
        report.entries.len(),
        if report.entries.len() == 1 { "y" } else { "ies" },
    );

    Ok(())
}
