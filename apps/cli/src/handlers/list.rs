use anyhow::{Context, Result};
use mforge_codegen::survey;
use std::path::Path;

/// Lists all modules discovered under the root with their descriptor facts.
///
/// # Result
/// Returns `Ok(())` after printing the module table (or a friendly
/// empty-state message).
///
/// # Errors
/// Returns an error if the root cannot be read or a descriptor is malformed.
pub fn list_modules(root: &Path) -> Result<()> {
    let modules = survey(root)
        .with_context(|| format!("Could not survey modules in '{}'", root.display()))?;

    if modules.is_empty() {
        println!("ℹ️ No modules found in '{}'.", root.display());
        return Ok(());
    }

    println!("\nModules:\n");
    println!("{:<18} {:<20} {:<25} {:<8}", "Folder", "Alias", "Target Type", "Items");
    println!("{:-<75}", "");

    for module in &modules {
        println!(
            "{:<18} {:<20} {:<25} {:<8}",
            module.folder, module.alias, module.target_type_name, module.item_count
        );
    }
    println!();

    Ok(())
}
