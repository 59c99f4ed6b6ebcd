//! Read-only file access over game assets extracted to device storage.
//!
//! Packaged assets are unpacked once into a directory on internal storage
//! (on Android, `<files dir>/assets`). This crate redirects the engine's
//! virtual paths (`res://...`) to that directory and serves them through the
//! same handle contract every other platform backend implements.
//!
//! # Architecture
//!
//! - [`AssetsConfig`] — the extraction root, built once and shared by `Arc`
//! - [`FileAccess`] — the per-file handle contract the engine dispatches on
//! - [`ExtractedAssetFile`] — the [`FileAccess`] backend for extracted assets
//! - [`ExtractedAssetsDir`] — read-only directory listing over the same tree
//!
//! ```no_run
//! use std::sync::Arc;
//! use extracted_assets_vfs::{AccessFlags, AssetsConfig, ExtractedAssetFile, FileAccess};
//!
//! let config = Arc::new(AssetsConfig::for_files_dir("/data/user/0/org.example/files"));
//! let mut file = ExtractedAssetFile::new(config.clone());
//! file.open("res://data.bin", AccessFlags::READ)?;
//! file.seek_end(-3)?;
//! let tail = file.read_to_end()?;
//! # Ok::<(), extracted_assets_vfs::VfsError>(())
//! ```
//!
//! # Read-Only
//!
//! Every write-path call (opening with [`AccessFlags::WRITE`], `flush`,
//! `store_buffer`, `resize`, delete, rename, directory mutation) returns
//! [`VfsError::ReadOnly`] without touching the disk.

mod access;
mod asset_file;
mod config;
mod directory;
mod error;
pub mod path;

pub use access::{AccessFlags, FileAccess, FileStatus};
pub use asset_file::ExtractedAssetFile;
pub use config::{AssetsConfig, DEFAULT_ASSETS_ROOT};
pub use directory::{DirEntry, DirHandle, ExtractedAssetsDir};
pub use error::{VfsError, VfsResult};
