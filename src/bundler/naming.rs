//! Output file naming for native addons.

use super::fingerprint::{DEFAULT_HASH_LENGTH, HashAlgorithm};
use std::path::Path;

/// Rule used to turn an artifact's file name into its output file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingPolicy {
    /// Insert the content digest into the file name.
    pub hash: bool,
    /// Number of hex characters kept from the digest.
    pub hash_length: usize,
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            hash: true,
            hash_length: DEFAULT_HASH_LENGTH,
            algorithm: HashAlgorithm::default(),
        }
    }
}

impl NamingPolicy {
    /// Builds the output file name for `base_name` + `extension`.
    ///
    /// With hashing enabled this is `<base>.<digest><ext>`, otherwise the
    /// original name verbatim.
    pub fn output_file_name(&self, base_name: &str, extension: &str, digest: &str) -> String {
        if self.hash {
            format!("{base_name}.{digest}{extension}")
        } else {
            format!("{base_name}{extension}")
        }
    }
}

/// Splits the file name of `path` into base name and extension.
///
/// The extension keeps its leading dot (`foo.node` → `("foo", ".node")`).
/// Dotfiles such as `.node` have no extension, matching how Node's
/// `path.parse` treats them.
pub fn split_file_name(path: &Path) -> (String, String) {
    let base = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (base, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_name() {
        assert_eq!(
            split_file_name(Path::new("/a/b/foo.node")),
            ("foo".to_string(), ".node".to_string())
        );
    }

    #[test]
    fn keeps_inner_dots_in_base_name() {
        assert_eq!(
            split_file_name(Path::new("trackpad-macos.arm64.node")),
            ("trackpad-macos.arm64".to_string(), ".node".to_string())
        );
    }

    #[test]
    fn dotfile_has_no_extension() {
        assert_eq!(
            split_file_name(Path::new("dir/.node")),
            (".node".to_string(), String::new())
        );
    }

    #[test]
    fn hashed_name_inserts_digest_before_extension() {
        let policy = NamingPolicy::default();
        assert_eq!(
            policy.output_file_name("foo", ".node", "abc12345"),
            "foo.abc12345.node"
        );
    }

    #[test]
    fn unhashed_name_is_verbatim() {
        let policy = NamingPolicy {
            hash: false,
            ..Default::default()
        };
        assert_eq!(policy.output_file_name("foo", ".node", "abc12345"), "foo.node");
        assert_eq!(policy.output_file_name("bare", "", "ffff"), "bare");
    }
}
