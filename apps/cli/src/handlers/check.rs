use anyhow::{Context, Result};
use mforge_codegen::check;
use std::path::Path;

/// Validates every module under the root without writing anything:
/// descriptors parse, templates exist, markers occur exactly once, aliases
/// are unique.
///
/// # Result
/// Returns `Ok(())` after printing the number of validated modules.
///
/// # Errors
/// Returns the first validation failure, naming the offending path.
pub fn check_modules(root: &Path) -> Result<()> {
    let checked = check(root)
        .with_context(|| format!("Validation failed for '{}'", root.display()))?;

    if checked == 0 {
        println!("ℹ️ No modules found in '{}'.", root.display());
        return Ok(());
    }

    println!("✅ {checked} module(s) validated.");

    Ok(())
}
