//! Incremental rebuild gate. The default mode keeps parity with the
//! observed timestamp rule: a module regenerates when any input (either
//! template or the descriptor) is at least as recently modified as the
//! existing output pair, or an output is missing. Digest mode trades that
//! fragility on coarse-mtime filesystems for a sha256 witness recorded in
//! the generated files themselves.

use crate::error::ForgeError;
use crate::fsio;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Line prefix under which generated outputs record their input digest.
pub(crate) const DIGEST_PREFIX: &str = "// mforge:digest ";

/// Staleness detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateMode {
    /// Modification-timestamp comparison (behavioral parity).
    #[default]
    Timestamp,
    /// Content hash of the inputs against the digest recorded in the outputs.
    Digest,
}

/// The three inputs that feed one module's generation.
#[derive(Debug, Clone, Copy)]
pub struct ModuleInputs<'a> {
    pub descriptor: &'a Path,
    pub decl_template: &'a Path,
    pub impl_template: &'a Path,
}

impl<'a> ModuleInputs<'a> {
    fn paths(&self) -> [&'a Path; 3] {
        [self.descriptor, self.decl_template, self.impl_template]
    }
}

/// Decides whether the module's output pair must be regenerated. One
/// decision covers both files; the pair is always rewritten wholesale.
///
/// # Errors
/// Returns [`ForgeError::Io`] if an input cannot be inspected.
pub fn needs_regeneration(
    mode: GateMode,
    inputs: ModuleInputs<'_>,
    decl_out: &Path,
    impl_out: &Path,
    digest: &str,
) -> Result<bool, ForgeError> {
    if !decl_out.is_file() || !impl_out.is_file() {
        return Ok(true);
    }

    match mode {
        GateMode::Timestamp => {
            let mut newest_input = SystemTime::UNIX_EPOCH;
            for path in inputs.paths() {
                newest_input = newest_input.max(fsio::mtime(path)?);
            }
            let oldest_output = fsio::mtime(decl_out)?.min(fsio::mtime(impl_out)?);
            Ok(newest_input >= oldest_output)
        }
        GateMode::Digest => {
            for output in [decl_out, impl_out] {
                let text = fsio::read_file(output)?;
                if recorded_digest(&text) != Some(digest) {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// sha256 over the three input files, in a fixed order.
///
/// # Errors
/// Returns [`ForgeError::Io`] if an input cannot be read.
pub fn input_digest(inputs: ModuleInputs<'_>) -> Result<String, ForgeError> {
    let mut hasher = Sha256::new();
    for path in inputs.paths() {
        let bytes = fs::read(path).map_err(|e| ForgeError::io(path, e))?;
        hasher.update(&bytes);
        hasher.update([0u8]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Extracts the digest recorded in a generated file's banner.
pub(crate) fn recorded_digest(text: &str) -> Option<&str> {
    text.lines().take(4).find_map(|line| line.strip_prefix(DIGEST_PREFIX)).map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{File, FileTimes};
    use std::path::PathBuf;
    use std::time::Duration;

    struct Fixture {
        _dir: tempfile::TempDir,
        descriptor: PathBuf,
        decl_template: PathBuf,
        impl_template: PathBuf,
        decl_out: PathBuf,
        impl_out: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let at = |name: &str| dir.path().join(name);
            for name in ["m.json", "m._hpp", "m._cpp", "m.hpp", "m.cpp"] {
                fs::write(at(name), name).unwrap();
            }
            Self {
                descriptor: at("m.json"),
                decl_template: at("m._hpp"),
                impl_template: at("m._cpp"),
                decl_out: at("m.hpp"),
                impl_out: at("m.cpp"),
                _dir: dir,
            }
        }

        fn inputs(&self) -> ModuleInputs<'_> {
            ModuleInputs {
                descriptor: &self.descriptor,
                decl_template: &self.decl_template,
                impl_template: &self.impl_template,
            }
        }

        fn age(&self, path: &Path, seconds_ago: u64) {
            let t = SystemTime::now() - Duration::from_secs(seconds_ago);
            let file = File::options().write(true).open(path).unwrap();
            file.set_times(FileTimes::new().set_modified(t)).unwrap();
        }
    }

    #[test]
    fn missing_output_forces_regeneration() {
        let fx = Fixture::new();
        fs::remove_file(&fx.impl_out).unwrap();

        let stale =
            needs_regeneration(GateMode::Timestamp, fx.inputs(), &fx.decl_out, &fx.impl_out, "")
                .unwrap();
        assert!(stale);
    }

    #[test]
    fn older_inputs_do_not_trigger() {
        let fx = Fixture::new();
        for path in fx.inputs().paths() {
            fx.age(path, 100);
        }
        fx.age(&fx.decl_out, 10);
        fx.age(&fx.impl_out, 10);

        let stale =
            needs_regeneration(GateMode::Timestamp, fx.inputs(), &fx.decl_out, &fx.impl_out, "")
                .unwrap();
        assert!(!stale);
    }

    #[test]
    fn touched_template_triggers() {
        let fx = Fixture::new();
        for path in fx.inputs().paths() {
            fx.age(path, 100);
        }
        fx.age(&fx.decl_out, 50);
        fx.age(&fx.impl_out, 50);
        fx.age(&fx.impl_template, 10);

        let stale =
            needs_regeneration(GateMode::Timestamp, fx.inputs(), &fx.decl_out, &fx.impl_out, "")
                .unwrap();
        assert!(stale);
    }

    #[test]
    fn equal_timestamps_trigger() {
        // Coarse-mtime parity: "at least as recent" regenerates.
        let fx = Fixture::new();
        let t = SystemTime::now() - Duration::from_secs(100);
        for path in fx.inputs().paths().into_iter().chain([&*fx.decl_out, &*fx.impl_out]) {
            let file = File::options().write(true).open(path).unwrap();
            file.set_times(FileTimes::new().set_modified(t)).unwrap();
        }

        let stale =
            needs_regeneration(GateMode::Timestamp, fx.inputs(), &fx.decl_out, &fx.impl_out, "")
                .unwrap();
        assert!(stale);
    }

    #[test]
    fn digest_mode_ignores_timestamps() {
        let fx = Fixture::new();
        let digest = input_digest(fx.inputs()).unwrap();
        for out in [&fx.decl_out, &fx.impl_out] {
            fs::write(out, format!("// banner\n{DIGEST_PREFIX}{digest}\n\ntext")).unwrap();
        }
        // Inputs fresher than outputs; the digest still matches.
        fx.age(&fx.decl_out, 100);
        fx.age(&fx.impl_out, 100);

        let stale =
            needs_regeneration(GateMode::Digest, fx.inputs(), &fx.decl_out, &fx.impl_out, &digest)
                .unwrap();
        assert!(!stale);

        fs::write(&fx.descriptor, "changed").unwrap();
        let digest = input_digest(fx.inputs()).unwrap();
        let stale =
            needs_regeneration(GateMode::Digest, fx.inputs(), &fx.decl_out, &fx.impl_out, &digest)
                .unwrap();
        assert!(stale);
    }

    #[test]
    fn digest_changes_with_any_input() {
        let fx = Fixture::new();
        let before = input_digest(fx.inputs()).unwrap();
        fs::write(&fx.impl_template, "tweaked").unwrap();
        assert_ne!(before, input_digest(fx.inputs()).unwrap());
    }
}
