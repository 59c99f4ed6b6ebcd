use bitflags::bitflags;

use crate::error::{VfsError, VfsResult};

bitflags! {
    /// Mode flags passed to [`FileAccess::open`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u32 {
        /// Open for reading.
        const READ = 1 << 0;
        /// Open for writing.
        const WRITE = 1 << 1;
        /// Open for reading and writing, keeping existing contents.
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
        /// Open for writing and reading, truncating existing contents.
        const WRITE_READ = Self::READ_WRITE.bits() | 1 << 2;
    }
}

impl Default for AccessFlags {
    fn default() -> Self {
        Self::READ
    }
}

/// Error state reported by [`FileAccess::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    Ok,
    /// The cursor has reached the end of the file.
    EndOfFile,
}

/// A stateful handle onto one file of a storage backend.
///
/// This is the contract every platform backend exposes to the engine's
/// file layer. A handle owns at most one open file; opening again first
/// releases the previous one.
///
/// # Read vs Write
///
/// Read and cursor operations are required. Write-path operations
/// (`flush`, `store_buffer`, `resize`) have default implementations that
/// return [`VfsError::ReadOnly`], so read-only backends only override
/// [`is_read_only()`](FileAccess::is_read_only) if they ever gain writes.
pub trait FileAccess: Send {
    /// Open `path`, closing any file this handle already holds.
    fn open(&mut self, path: &str, flags: AccessFlags) -> VfsResult<()>;

    /// Release the open file, if any. Closing twice is a no-op.
    fn close(&mut self);

    fn is_open(&self) -> bool;

    /// The path as given to the last `open`.
    fn path(&self) -> &str;

    /// The simplified form of [`path()`](FileAccess::path).
    fn path_absolute(&self) -> &str;

    /// Move the cursor to `position`, clamped to the file length.
    fn seek(&mut self, position: u64) -> VfsResult<()>;

    /// Move the cursor to `length + offset`, clamped to `0..=length`.
    fn seek_end(&mut self, offset: i64) -> VfsResult<()>;

    fn position(&self) -> u64;

    fn length(&self) -> u64;

    fn eof_reached(&self) -> bool;

    /// Reports [`FileStatus::EndOfFile`] while the EOF flag is set.
    ///
    /// Open and read failures are returned by the failing call and are not
    /// remembered here.
    fn status(&self) -> FileStatus {
        if self.eof_reached() {
            FileStatus::EndOfFile
        } else {
            FileStatus::Ok
        }
    }

    /// Read up to `len` bytes into the front of `dst`.
    ///
    /// `len` must not exceed `dst.len()`. Returns the number of bytes read,
    /// which is short only at the end of the file.
    fn get_buffer(&mut self, dst: &mut [u8], len: u64) -> VfsResult<u64>;

    /// Read up to `dst.len()` bytes.
    fn read(&mut self, dst: &mut [u8]) -> VfsResult<usize> {
        let len = dst.len() as u64;
        let read = self.get_buffer(dst, len)?;
        Ok(read as usize)
    }

    /// Read everything from the cursor to the end of the file.
    fn read_to_end(&mut self) -> VfsResult<Vec<u8>> {
        let remaining = self.length().saturating_sub(self.position());
        let remaining = usize::try_from(remaining).map_err(|_| {
            VfsError::InvalidArgument(format!("{remaining} bytes do not fit in memory"))
        })?;
        let mut data = vec![0; remaining];
        let read = self.read(&mut data)?;
        data.truncate(read);
        Ok(data)
    }

    /// Read one byte. Returns 0 past the end of the file.
    fn read_u8(&mut self) -> VfsResult<u8> {
        let mut bytes = [0; 1];
        self.read(&mut bytes)?;
        Ok(bytes[0])
    }

    /// Read a little-endian `u16`. Missing trailing bytes read as 0.
    fn read_u16_le(&mut self) -> VfsResult<u16> {
        let mut bytes = [0; 2];
        self.read(&mut bytes)?;
        Ok(u16::from_le_bytes(bytes))
    }

    /// Read a little-endian `u32`. Missing trailing bytes read as 0.
    fn read_u32_le(&mut self) -> VfsResult<u32> {
        let mut bytes = [0; 4];
        self.read(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Read a little-endian `u64`. Missing trailing bytes read as 0.
    fn read_u64_le(&mut self) -> VfsResult<u64> {
        let mut bytes = [0; 8];
        self.read(&mut bytes)?;
        Ok(u64::from_le_bytes(bytes))
    }

    /// Read up to the next `\n` or the end of the file.
    ///
    /// The terminator is consumed and not returned. `\r` bytes are dropped.
    /// Invalid UTF-8 is replaced with U+FFFD.
    fn read_line(&mut self) -> VfsResult<String> {
        let mut line = Vec::new();
        let mut byte = [0; 1];
        while self.read(&mut byte)? == 1 {
            match byte[0] {
                b'\n' => break,
                b'\r' => {}
                b => line.push(b),
            }
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    // --- Write operations (optional, default returns ReadOnly) ---

    /// Whether this backend rejects every write-path operation.
    fn is_read_only(&self) -> bool {
        true
    }

    fn flush(&mut self) -> VfsResult<()> {
        log::warn!("flush() not supported on '{}'", self.path());
        Err(VfsError::ReadOnly)
    }

    fn store_buffer(&mut self, data: &[u8]) -> VfsResult<()> {
        log::warn!(
            "store_buffer({} bytes) not supported on '{}'",
            data.len(),
            self.path()
        );
        Err(VfsError::ReadOnly)
    }

    fn resize(&mut self, length: u64) -> VfsResult<()> {
        log::warn!("resize({length}) not supported on '{}'", self.path());
        Err(VfsError::ReadOnly)
    }
}
