use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::path;

/// On-device directory the packaged assets are extracted to by default.
pub const DEFAULT_ASSETS_ROOT: &str = "/data/user/0/com.shipthis.godotdemo/files/assets";

/// Location of the extracted asset tree.
///
/// The value is immutable once built. Share it between handles with an
/// `Arc` so every open in a session resolves against the same root.
///
/// # Example
///
/// ```
/// use extracted_assets_vfs::AssetsConfig;
///
/// let config = AssetsConfig::new("/data/user/0/org.example/files/assets");
/// assert_eq!(
///     config.resolve("res://textures/../data.bin"),
///     std::path::PathBuf::from("/data/user/0/org.example/files/assets/data.bin"),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetsConfig {
    root: PathBuf,
}

impl AssetsConfig {
    /// Create a config rooted at the given extraction directory.
    ///
    /// The directory does not need to exist yet. It is checked at open time.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Config for the `assets` directory under an application files dir.
    pub fn for_files_dir(files_dir: impl AsRef<Path>) -> Self {
        Self::new(files_dir.as_ref().join("assets"))
    }

    /// The extraction directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a virtual path to the real file path under the root.
    ///
    /// The path is simplified, its virtual root stripped, and the rest is
    /// appended to the root with a `/` separator.
    pub fn resolve(&self, virtual_path: &str) -> PathBuf {
        let simplified = path::simplify(virtual_path);
        let relative = path::strip_virtual_root(&simplified);

        let mut full = OsString::from(self.root.as_os_str());
        full.push("/");
        full.push(relative);
        PathBuf::from(full)
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ASSETS_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AssetsConfig {
        AssetsConfig::new("/storage/assets")
    }

    #[test]
    fn resolve_res_path() {
        assert_eq!(
            config().resolve("res://data.bin"),
            PathBuf::from("/storage/assets/data.bin")
        );
    }

    #[test]
    fn resolve_absolute_path() {
        assert_eq!(
            config().resolve("/levels/one.tscn"),
            PathBuf::from("/storage/assets/levels/one.tscn")
        );
    }

    #[test]
    fn resolve_relative_path() {
        assert_eq!(
            config().resolve("levels/one.tscn"),
            PathBuf::from("/storage/assets/levels/one.tscn")
        );
    }

    #[test]
    fn resolve_simplifies_first() {
        assert_eq!(
            config().resolve("res://a/./b/../c.txt"),
            PathBuf::from("/storage/assets/a/c.txt")
        );
    }

    #[test]
    fn resolve_keeps_unresolvable_parent() {
        assert_eq!(
            config().resolve("res://../escape.txt"),
            PathBuf::from("/storage/assets/../escape.txt")
        );
    }

    #[test]
    fn for_files_dir_appends_assets() {
        let config = AssetsConfig::for_files_dir("/data/user/0/org.example/files");
        assert_eq!(
            config.root(),
            Path::new("/data/user/0/org.example/files/assets")
        );
    }

    #[test]
    fn default_root() {
        assert_eq!(AssetsConfig::default().root(), Path::new(DEFAULT_ASSETS_ROOT));
    }
}
