use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use crate::access::{AccessFlags, FileAccess};
use crate::config::AssetsConfig;
use crate::error::{VfsError, VfsResult};
use crate::path;

/// Read-only file handle onto the extracted asset tree.
///
/// Virtual paths (`res://...`, `/...` or relative) are resolved against the
/// [`AssetsConfig`] root given at construction. The handle keeps its own
/// cursor, length and EOF flag next to a buffered reader.
///
/// Not `Clone`: a handle owns exactly one OS file at a time.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use extracted_assets_vfs::{AccessFlags, AssetsConfig, ExtractedAssetFile, FileAccess};
///
/// let config = Arc::new(AssetsConfig::for_files_dir("/data/user/0/org.example/files"));
/// let mut file = ExtractedAssetFile::new(config);
/// file.open("res://data.bin", AccessFlags::READ)?;
/// let bytes = file.read_to_end()?;
/// # Ok::<(), extracted_assets_vfs::VfsError>(())
/// ```
pub struct ExtractedAssetFile {
    config: Arc<AssetsConfig>,
    path: String,
    absolute_path: String,
    handle: Option<BufReader<File>>,
    position: u64,
    length: u64,
    eof: bool,
}

impl ExtractedAssetFile {
    /// Create a closed handle resolving paths against `config`.
    pub fn new(config: Arc<AssetsConfig>) -> Self {
        Self {
            config,
            path: String::new(),
            absolute_path: String::new(),
            handle: None,
            position: 0,
            length: 0,
            eof: false,
        }
    }

    /// Create a handle and open `path` for reading.
    pub fn open_read(config: Arc<AssetsConfig>, path: &str) -> VfsResult<Self> {
        let mut file = Self::new(config);
        file.open(path, AccessFlags::READ)?;
        Ok(file)
    }

    pub fn config(&self) -> &Arc<AssetsConfig> {
        &self.config
    }

    /// Whether `path` resolves to a regular file that can be opened for reading.
    ///
    /// Nothing is retained: a successfully opened file is closed right away.
    pub fn file_exists(config: &AssetsConfig, path: &str) -> bool {
        let full_path = config.resolve(path);
        let exists = open_regular(&full_path).is_ok();
        log::trace!(
            "file_exists('{path}') -> {exists} (checked '{}')",
            full_path.display()
        );
        exists
    }

    /// Extracted assets carry no meaningful modification time.
    pub fn modified_time(path: &str) -> u64 {
        log::trace!("modified_time('{path}') -> 0");
        0
    }

    pub fn delete(path: &str) -> VfsResult<()> {
        log::warn!("delete('{path}') not supported");
        Err(VfsError::ReadOnly)
    }

    pub fn rename(from: &str, to: &str) -> VfsResult<()> {
        log::warn!("rename('{from}' -> '{to}') not supported");
        Err(VfsError::ReadOnly)
    }
}

impl FileAccess for ExtractedAssetFile {
    fn open(&mut self, path: &str, flags: AccessFlags) -> VfsResult<()> {
        log::trace!("open(path='{path}', flags={flags:?})");
        self.close();

        self.path = path.to_owned();
        self.absolute_path = path::simplify(path);

        if flags.contains(AccessFlags::WRITE) {
            log::warn!("open('{path}') for writing rejected");
            return Err(VfsError::ReadOnly);
        }

        let full_path = self.config.resolve(path);
        log::trace!("resolved '{path}' to '{}'", full_path.display());

        let file = open_regular(&full_path).map_err(|source| {
            log::debug!("open failed for '{}': {source}", full_path.display());
            VfsError::OpenFailed {
                path: full_path.display().to_string(),
                source,
            }
        })?;

        let mut reader = BufReader::new(file);
        let length = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        self.handle = Some(reader);
        self.length = length;
        self.position = 0;
        self.eof = false;

        log::trace!("open('{path}') ok, length={length}");
        Ok(())
    }

    fn close(&mut self) {
        match self.handle.take() {
            Some(_) => log::trace!(
                "closing '{}' at {}/{}",
                self.path,
                self.position,
                self.length
            ),
            None => log::trace!("close(): no file open"),
        }
    }

    fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn path_absolute(&self) -> &str {
        &self.absolute_path
    }

    fn seek(&mut self, position: u64) -> VfsResult<()> {
        let handle = self.handle.as_mut().ok_or(VfsError::NotOpen)?;
        let target = position.min(self.length);
        handle.seek(SeekFrom::Start(target))?;

        self.position = target;
        self.eof = position >= self.length;

        log::trace!(
            "seek({position}) -> pos={}, eof={}",
            self.position,
            self.eof
        );
        Ok(())
    }

    fn seek_end(&mut self, offset: i64) -> VfsResult<()> {
        let handle = self.handle.as_mut().ok_or(VfsError::NotOpen)?;
        // Past-the-end offsets clamp to the length, so only a backward seek moves.
        let target = if offset < 0 {
            self.length.saturating_sub(offset.unsigned_abs())
        } else {
            self.length
        };
        handle.seek(SeekFrom::Start(target))?;

        self.position = target;
        self.eof = target >= self.length;

        log::trace!(
            "seek_end({offset}) -> pos={}, len={}, eof={}",
            self.position,
            self.length,
            self.eof
        );
        Ok(())
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn length(&self) -> u64 {
        self.length
    }

    fn eof_reached(&self) -> bool {
        self.eof
    }

    fn get_buffer(&mut self, dst: &mut [u8], len: u64) -> VfsResult<u64> {
        let wanted = usize::try_from(len)
            .ok()
            .filter(|wanted| *wanted <= dst.len())
            .ok_or_else(|| {
                VfsError::InvalidArgument(format!(
                    "read of {len} bytes into a {}-byte buffer",
                    dst.len()
                ))
            })?;
        let handle = self.handle.as_mut().ok_or(VfsError::NotOpen)?;

        let read = read_up_to(handle, &mut dst[..wanted])? as u64;

        // EOF is raised from the request size, before looking at what came back.
        if self.position.saturating_add(len) > self.length {
            self.eof = true;
        }
        if read > 0 {
            self.position = (self.position + read).min(self.length);
        }
        if self.position >= self.length {
            self.eof = true;
        }

        log::trace!(
            "get_buffer({len}) -> read={read}, pos={}, eof={}",
            self.position,
            self.eof
        );
        Ok(read)
    }
}

impl Drop for ExtractedAssetFile {
    fn drop(&mut self) {
        self.close();
    }
}

/// Open `path` for reading, refusing directories.
fn open_regular(path: &Path) -> io::Result<File> {
    let file = File::open(path)?;
    if file.metadata()?.is_dir() {
        return Err(io::ErrorKind::IsADirectory.into());
    }
    Ok(file)
}

/// Fill `buf` until it is full or the reader is exhausted.
fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
