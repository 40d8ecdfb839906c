//! Template assembly. Each module carries a hand-authored pair: the
//! declaration template (`<module>._hpp`) holds exactly one `private:`
//! marker after which synthesized members are inserted; the implementation
//! template (`<module>._cpp`) is an append base that receives the
//! apply/read-back/termination fragments. Outputs are machine-owned and
//! open with a generated-file banner.

use crate::error::ForgeError;
use crate::fsio;
use crate::gate::DIGEST_PREFIX;
use crate::synth::Fragments;
use std::path::{Path, PathBuf};

/// Insertion marker for member declarations.
pub const MEMBER_MARKER: &str = "private:";
/// Marker comment in `base._cpp` replaced by the dispatch entries.
pub const DISPATCH_MARKER: &str = "// Module Dispatch List";

const BANNER: &str = "// Auto-generated by mforge. Do not edit by hand.\n";

/// A module's hand-authored template pair, loaded into memory.
#[derive(Debug, Clone)]
pub struct TemplatePair {
    pub decl_path: PathBuf,
    pub impl_path: PathBuf,
    decl_text: String,
    impl_text: String,
}

impl TemplatePair {
    /// Loads `<module>._hpp` and `<module>._cpp` from the module directory.
    ///
    /// # Errors
    /// Returns [`ForgeError::MissingTemplate`] if either half is absent — a
    /// module cannot be generated without its hand-authored part — and
    /// [`ForgeError::Io`] on read failure.
    pub fn load(module_dir: &Path, module_name: &str) -> Result<Self, ForgeError> {
        let decl_path = module_dir.join(format!("{module_name}._hpp"));
        let impl_path = module_dir.join(format!("{module_name}._cpp"));

        for path in [&decl_path, &impl_path] {
            if !path.is_file() {
                return Err(ForgeError::MissingTemplate { path: path.clone() });
            }
        }

        let decl_text = fsio::read_file(&decl_path)?;
        let impl_text = fsio::read_file(&impl_path)?;

        Ok(Self { decl_path, impl_path, decl_text, impl_text })
    }

    /// Produces the declaration output: the banner, then the template with
    /// the synthesized members inserted after the single `private:` marker.
    ///
    /// # Errors
    /// Returns [`ForgeError::Marker`] if the marker occurs zero or multiple
    /// times; an ambiguous insertion point must never produce output.
    pub fn assemble_declaration(
        &self,
        digest: &str,
        declarations: &str,
    ) -> Result<String, ForgeError> {
        let body = replace_marker(
            &self.decl_text,
            MEMBER_MARKER,
            &format!("{MEMBER_MARKER}\n{declarations}"),
            &self.decl_path,
        )?;
        Ok(format!("{}{body}", banner_with_digest(digest)))
    }

    /// Produces the implementation output: banner, the template's base text,
    /// then the synthesized fragments appended in a fixed order.
    #[must_use]
    pub fn assemble_implementation(&self, digest: &str, fragments: &Fragments) -> String {
        format!(
            "{}{}\n\n{}\n{}\n{}",
            banner_with_digest(digest),
            self.impl_text.trim_end(),
            fragments.apply,
            fragments.read_back,
            fragments.termination,
        )
    }
}

/// Banner for the aggregate base files, which carry no digest witness.
#[must_use]
pub(crate) fn banner() -> String {
    format!("{BANNER}\n")
}

pub(crate) fn banner_with_digest(digest: &str) -> String {
    format!("{BANNER}{DIGEST_PREFIX}{digest}\n\n")
}

/// Replaces a marker that must occur exactly once.
pub(crate) fn replace_marker(
    text: &str,
    marker: &str,
    replacement: &str,
    path: &Path,
) -> Result<String, ForgeError> {
    let found = text.matches(marker).count();
    if found != 1 {
        return Err(ForgeError::Marker {
            path: path.to_path_buf(),
            marker: marker.to_owned(),
            found,
        });
    }
    Ok(text.replacen(marker, replacement, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn pair(decl: &str, imp: &str) -> TemplatePair {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("m._hpp"), decl).unwrap();
        fs::write(dir.path().join("m._cpp"), imp).unwrap();
        TemplatePair::load(dir.path(), "m").unwrap()
    }

    #[test]
    fn missing_half_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("m._hpp"), "class M {};").unwrap();

        let err = TemplatePair::load(dir.path(), "m").unwrap_err();
        assert!(matches!(err, ForgeError::MissingTemplate { path } if path.ends_with("m._cpp")));
    }

    #[test]
    fn single_marker_receives_declarations() {
        let pair = pair("class M\n{\n private:\n};\n", "#include \"m.hpp\"\n");
        let out = pair.assemble_declaration("abc", "  int _x;\n").unwrap();

        assert!(out.starts_with("// Auto-generated by mforge."));
        assert!(out.contains("// mforge:digest abc"));
        assert!(out.contains("private:\n  int _x;\n"));
    }

    #[test]
    fn zero_markers_fail() {
        let pair = pair("class M {};\n", "");
        let err = pair.assemble_declaration("abc", "  int _x;\n").unwrap_err();
        assert!(matches!(err, ForgeError::Marker { found: 0, .. }));
    }

    #[test]
    fn multiple_markers_fail() {
        let pair = pair("private:\nprivate:\n", "");
        let err = pair.assemble_declaration("abc", "  int _x;\n").unwrap_err();
        assert!(matches!(err, ForgeError::Marker { found: 2, .. }));
    }

    #[test]
    fn implementation_is_append_only() {
        let pair = pair("private:\n", "#include \"m.hpp\"\n\nM::M() {}\n");
        let fragments = Fragments {
            declarations: String::new(),
            apply: "void M::applyConfiguration(nlohmann::json& js)\n{\n}\n".to_owned(),
            read_back: "nlohmann::json M::readConfiguration()\n{\n return {};\n}\n".to_owned(),
            termination: "bool M::checkTermination()\n{\n return false;\n}\n".to_owned(),
        };

        let out = pair.assemble_implementation("abc", &fragments);
        let base_at = out.find("M::M() {}").unwrap();
        let apply_at = out.find("applyConfiguration").unwrap();
        let read_at = out.find("readConfiguration").unwrap();
        let term_at = out.find("checkTermination").unwrap();

        assert!(base_at < apply_at && apply_at < read_at && read_at < term_at);
    }
}
