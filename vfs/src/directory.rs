use std::collections::HashMap;
use std::sync::Arc;

use crate::asset_file::ExtractedAssetFile;
use crate::config::AssetsConfig;
use crate::error::{VfsError, VfsResult};

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File or directory name (not a full path).
    pub name: String,
    pub is_dir: bool,
    /// Dot-files are hidden.
    pub is_hidden: bool,
}

/// Opaque identifier of an open directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirHandle(u32);

struct DirListing {
    entries: Vec<DirEntry>,
    next: usize,
}

impl DirListing {
    /// The entry most recently returned by `dir_next`.
    fn current(&self) -> Option<&DirEntry> {
        self.next.checked_sub(1).and_then(|i| self.entries.get(i))
    }
}

/// Read-only directory access over the extracted asset tree.
///
/// Paths are resolved exactly like [`ExtractedAssetFile`] resolves them.
/// Listings are snapshots taken at `dir_open` time. Mutating operations
/// always return [`VfsError::ReadOnly`].
pub struct ExtractedAssetsDir {
    config: Arc<AssetsConfig>,
    listings: HashMap<DirHandle, DirListing>,
    last_id: u32,
}

impl ExtractedAssetsDir {
    pub fn new(config: Arc<AssetsConfig>) -> Self {
        Self {
            config,
            listings: HashMap::new(),
            last_id: 0,
        }
    }

    pub fn dir_exists(&self, path: &str) -> bool {
        let exists = self.config.resolve(path).is_dir();
        log::trace!("dir_exists('{path}') -> {exists}");
        exists
    }

    pub fn file_exists(&self, path: &str) -> bool {
        ExtractedAssetFile::file_exists(&self.config, path)
    }

    /// List the immediate children of a directory, sorted by name.
    ///
    /// Names that are not valid UTF-8 are skipped.
    pub fn list_dir(&self, path: &str) -> VfsResult<Vec<DirEntry>> {
        let full_path = self.config.resolve(path);
        if !full_path.is_dir() {
            log::trace!("list_dir('{path}'): not a directory");
            return Err(VfsError::NotADirectory(path.to_owned()));
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&full_path)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                entries.push(DirEntry {
                    is_dir: entry.path().is_dir(),
                    is_hidden: name.starts_with('.'),
                    name: name.to_owned(),
                });
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        log::trace!("list_dir('{path}') -> {} entries", entries.len());
        Ok(entries)
    }

    /// Start iterating a directory. Release the handle with `dir_close`.
    pub fn dir_open(&mut self, path: &str) -> VfsResult<DirHandle> {
        let entries = self.list_dir(path)?;
        self.last_id += 1;
        let handle = DirHandle(self.last_id);
        log::trace!(
            "dir_open('{path}') -> id={} ({} entries)",
            handle.0,
            entries.len()
        );
        self.listings.insert(handle, DirListing { entries, next: 0 });
        Ok(handle)
    }

    /// Advance to the next entry. Returns `None` once the listing is exhausted.
    pub fn dir_next(&mut self, handle: DirHandle) -> VfsResult<Option<DirEntry>> {
        let listing = self.listing_mut(handle)?;
        let entry = listing.entries.get(listing.next).cloned();
        listing.next = (listing.next + 1).min(listing.entries.len() + 1);
        log::trace!(
            "dir_next(id={}) -> {:?}",
            handle.0,
            entry.as_ref().map(|e| e.name.as_str())
        );
        Ok(entry)
    }

    /// Whether the entry last returned by `dir_next` is a directory.
    pub fn current_is_dir(&self, handle: DirHandle) -> VfsResult<bool> {
        let listing = self.listing(handle)?;
        Ok(listing.current().is_some_and(|e| e.is_dir))
    }

    /// Whether the entry last returned by `dir_next` is hidden.
    pub fn current_is_hidden(&self, handle: DirHandle) -> VfsResult<bool> {
        let listing = self.listing(handle)?;
        Ok(listing.current().is_some_and(|e| e.is_hidden))
    }

    pub fn has_handle(&self, handle: DirHandle) -> bool {
        self.listings.contains_key(&handle)
    }

    pub fn dir_close(&mut self, handle: DirHandle) {
        self.listings.remove(&handle);
        log::trace!("dir_close(id={})", handle.0);
    }

    /// Extracted assets live on a single volume with no drive letters.
    pub fn drive_count(&self) -> usize {
        0
    }

    pub fn space_left(&self) -> u64 {
        0
    }

    pub fn make_dir(&self, path: &str) -> VfsResult<()> {
        log::warn!("make_dir('{path}') not supported");
        Err(VfsError::ReadOnly)
    }

    pub fn rename(&self, from: &str, to: &str) -> VfsResult<()> {
        log::warn!("rename('{from}' -> '{to}') not supported");
        Err(VfsError::ReadOnly)
    }

    pub fn remove(&self, path: &str) -> VfsResult<()> {
        log::warn!("remove('{path}') not supported");
        Err(VfsError::ReadOnly)
    }

    fn listing(&self, handle: DirHandle) -> VfsResult<&DirListing> {
        self.listings
            .get(&handle)
            .ok_or(VfsError::InvalidHandle(handle.0))
    }

    fn listing_mut(&mut self, handle: DirHandle) -> VfsResult<&mut DirListing> {
        self.listings
            .get_mut(&handle)
            .ok_or(VfsError::InvalidHandle(handle.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("extracted_assets_vfs_dir_test_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn populate(dir: &std::path::Path) {
        std::fs::write(dir.join("b.txt"), b"b").unwrap();
        std::fs::write(dir.join(".hidden"), b"").unwrap();
        std::fs::create_dir_all(dir.join("a_dir/nested")).unwrap();
        std::fs::write(dir.join("a_dir/inner.txt"), b"inner").unwrap();
    }

    fn access(dir: &std::path::Path) -> ExtractedAssetsDir {
        ExtractedAssetsDir::new(Arc::new(AssetsConfig::new(dir)))
    }

    #[test]
    fn exists_checks() {
        let dir = temp_dir("exists");
        populate(&dir);

        let access = access(&dir);
        assert!(access.dir_exists("res://"));
        assert!(access.dir_exists("res://a_dir"));
        assert!(access.dir_exists("/a_dir/nested"));
        assert!(!access.dir_exists("res://b.txt"));
        assert!(access.file_exists("res://b.txt"));
        assert!(!access.file_exists("res://a_dir"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn list_root_sorted() {
        let dir = temp_dir("list_root");
        populate(&dir);

        let entries = access(&dir).list_dir("res://").unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec![".hidden", "a_dir", "b.txt"]);
        assert!(entries[0].is_hidden);
        assert!(entries[1].is_dir);
        assert!(!entries[2].is_dir);
        assert!(!entries[2].is_hidden);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn list_nested() {
        let dir = temp_dir("list_nested");
        populate(&dir);

        let entries = access(&dir).list_dir("res://a_dir").unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["inner.txt", "nested"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn list_non_directory_fails() {
        let dir = temp_dir("list_file");
        populate(&dir);

        let access = access(&dir);
        assert!(matches!(
            access.list_dir("res://b.txt"),
            Err(VfsError::NotADirectory(_))
        ));
        assert!(matches!(
            access.list_dir("res://missing"),
            Err(VfsError::NotADirectory(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn iterate_with_handle() {
        let dir = temp_dir("iterate");
        populate(&dir);

        let mut access = access(&dir);
        let handle = access.dir_open("res://").unwrap();
        assert!(access.has_handle(handle));
        assert!(!access.current_is_dir(handle).unwrap());

        let first = access.dir_next(handle).unwrap().unwrap();
        assert_eq!(first.name, ".hidden");
        assert!(access.current_is_hidden(handle).unwrap());

        let second = access.dir_next(handle).unwrap().unwrap();
        assert_eq!(second.name, "a_dir");
        assert!(access.current_is_dir(handle).unwrap());

        let third = access.dir_next(handle).unwrap().unwrap();
        assert_eq!(third.name, "b.txt");
        assert!(!access.current_is_dir(handle).unwrap());

        assert!(access.dir_next(handle).unwrap().is_none());
        assert!(access.dir_next(handle).unwrap().is_none());
        assert!(!access.current_is_dir(handle).unwrap());

        access.dir_close(handle);
        assert!(!access.has_handle(handle));
        assert!(matches!(
            access.dir_next(handle),
            Err(VfsError::InvalidHandle(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn handles_are_distinct() {
        let dir = temp_dir("handles");
        populate(&dir);

        let mut access = access(&dir);
        let a = access.dir_open("res://").unwrap();
        let b = access.dir_open("res://a_dir").unwrap();
        assert_ne!(a, b);
        assert_eq!(access.dir_next(b).unwrap().unwrap().name, "inner.txt");
        assert_eq!(access.dir_next(a).unwrap().unwrap().name, ".hidden");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn mutations_rejected() {
        let dir = temp_dir("mutations");
        populate(&dir);

        let access = access(&dir);
        assert!(matches!(access.make_dir("res://new"), Err(VfsError::ReadOnly)));
        assert!(matches!(
            access.rename("res://b.txt", "res://c.txt"),
            Err(VfsError::ReadOnly)
        ));
        assert!(matches!(access.remove("res://b.txt"), Err(VfsError::ReadOnly)));
        assert!(dir.join("b.txt").exists());
        assert!(!dir.join("new").exists());
        assert_eq!(access.drive_count(), 0);
        assert_eq!(access.space_left(), 0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
