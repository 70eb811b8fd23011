/// Scoped module reader and writer
///
/// Both guards release their module when dropped, so an early return with `?`
/// never leaves the container cursor inside a half-processed module.

use crate::container::{ModuleInfo, Snapshot};
use crate::error::{Result, SnapshotError};
use crate::format::{ModuleVersion, MODULE_HEADER_SIZE};
use log::debug;
use std::io;

/// Writer for one module being appended to a container
pub struct ModuleWriter<'a> {
    snapshot: &'a mut Snapshot,
    name: String,
    start: usize,
    closed: bool,
}

impl<'a> ModuleWriter<'a> {
    pub(crate) fn new(snapshot: &'a mut Snapshot, name: &str, start: usize) -> Self {
        Self {
            snapshot,
            name: name.to_string(),
            start,
            closed: false,
        }
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write a byte
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.snapshot.append(&[value])
    }

    /// Write a little-endian word
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.snapshot.append(&value.to_le_bytes())
    }

    /// Write a little-endian double word
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.snapshot.append(&value.to_le_bytes())
    }

    /// Write a raw byte array
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.snapshot.append(bytes)
    }

    /// Finish the module and fix up its size
    pub fn close(mut self) -> Result<()> {
        self.finish();
        Ok(())
    }

    fn finish(&mut self) {
        if !self.closed {
            self.snapshot.patch_size(self.start);
            self.closed = true;
            debug!("Closed module {}", self.name);
        }
    }
}

impl Drop for ModuleWriter<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Reader for one module of a container
pub struct ModuleReader<'a> {
    snapshot: &'a mut Snapshot,
    info: ModuleInfo,
    pos: usize,
    end: usize,
}

impl<'a> ModuleReader<'a> {
    pub(crate) fn new(snapshot: &'a mut Snapshot, info: ModuleInfo) -> Self {
        let pos = info.offset + MODULE_HEADER_SIZE;
        let end = info.offset + info.size;
        Self {
            snapshot,
            info,
            pos,
            end,
        }
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Module version
    pub fn version(&self) -> ModuleVersion {
        self.info.version
    }

    /// Bytes left in the module
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    /// Read a byte
    pub fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_bytes(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a little-endian word
    pub fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_bytes(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read a little-endian double word
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_bytes(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Fill `buf` from the module
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.len() > self.remaining() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("read past end of module {}", self.info.name),
            )
            .into());
        }
        buf.copy_from_slice(self.snapshot.bytes(self.pos, self.pos + buf.len()));
        self.pos += buf.len();
        Ok(())
    }

    /// Read `len` bytes into a newly allocated buffer
    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        if len > self.remaining() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("read past end of module {}", self.info.name),
            )
            .into());
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(|_| {
            SnapshotError::AllocationFailure(format!("{} bytes for module {}", len, self.info.name))
        })?;
        buf.resize(len, 0);
        self.read_bytes(&mut buf)?;
        Ok(buf)
    }

    /// Release the module and move the cursor past it
    pub fn close(self) {}
}

impl Drop for ModuleReader<'_> {
    fn drop(&mut self) {
        self.snapshot.set_cursor(self.end);
        debug!("Closed module {}", self.info.name);
    }
}
