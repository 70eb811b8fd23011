/// Snapshot container

use crate::container::{ModuleInfo, ModuleReader, ModuleWriter};
use crate::error::{Result, SnapshotError};
use crate::format::constants::*;
use crate::format::ModuleVersion;
use log::debug;
use std::path::Path;

/// An in-memory snapshot container
///
/// Modules are appended on write. On read, modules are located by scanning
/// forward from the cursor; a module that is closed moves the cursor past it,
/// so readers must consume modules in the order they were written.
#[derive(Debug, Clone)]
pub struct Snapshot {
    machine: String,
    version: ModuleVersion,
    data: Vec<u8>,
    cursor: usize,
    size_limit: Option<usize>,
}

impl Snapshot {
    /// Create an empty container for a machine
    pub fn create(machine: &str) -> Self {
        let mut data = Vec::with_capacity(SNAPSHOT_HEADER_SIZE);
        data.extend_from_slice(SNAPSHOT_MAGIC);
        data.push(SNAPSHOT_MAJOR);
        data.push(SNAPSHOT_MINOR);
        data.extend_from_slice(&pad_name(machine, MACHINE_NAME_LEN));

        Self {
            machine: truncate_name(machine, MACHINE_NAME_LEN),
            version: ModuleVersion::new(SNAPSHOT_MAJOR, SNAPSHOT_MINOR),
            data,
            cursor: SNAPSHOT_HEADER_SIZE,
            size_limit: None,
        }
    }

    /// Parse a container from raw bytes
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() < SNAPSHOT_HEADER_SIZE || !data.starts_with(SNAPSHOT_MAGIC) {
            return Err(SnapshotError::malformed("Not a snapshot file"));
        }

        let offset = SNAPSHOT_MAGIC.len();
        let version = ModuleVersion::new(data[offset], data[offset + 1]);
        let machine = unpad_name(&data[offset + 2..offset + 2 + MACHINE_NAME_LEN]);

        let snapshot = Self {
            machine,
            version,
            data,
            cursor: SNAPSHOT_HEADER_SIZE,
            size_limit: None,
        };

        // Walk the directory once so framing errors surface at open time
        snapshot.modules()?;
        Ok(snapshot)
    }

    /// Read a container from a file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Write the container to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Cap the total container size; writes beyond it fail
    pub fn with_size_limit(mut self, limit: usize) -> Self {
        self.size_limit = Some(limit);
        self
    }

    /// Machine name from the file header
    pub fn machine_name(&self) -> &str {
        &self.machine
    }

    /// Container format version
    pub fn version(&self) -> ModuleVersion {
        self.version
    }

    /// Raw container bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the container, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Total size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check whether the container holds any modules
    pub fn is_empty(&self) -> bool {
        self.data.len() <= SNAPSHOT_HEADER_SIZE
    }

    /// Move the read cursor back to the first module
    pub fn rewind(&mut self) {
        self.cursor = SNAPSHOT_HEADER_SIZE;
    }

    /// List every module in the container
    pub fn modules(&self) -> Result<Vec<ModuleInfo>> {
        let mut modules = Vec::new();
        let mut offset = SNAPSHOT_HEADER_SIZE;

        while let Some(info) = self.module_at(offset)? {
            offset += info.size;
            modules.push(info);
        }

        Ok(modules)
    }

    /// Check whether a module is present at or after the cursor
    pub fn contains_module(&self, name: &str) -> Result<bool> {
        Ok(self.find_module(name)?.is_some())
    }

    /// Start a new module at the end of the container
    pub fn create_module(&mut self, name: &str, major: u8, minor: u8) -> Result<ModuleWriter<'_>> {
        if name.is_empty() || name.len() > MODULE_NAME_LEN {
            return Err(SnapshotError::malformed(format!(
                "Module name '{}' must be 1-{} bytes",
                name, MODULE_NAME_LEN
            )));
        }

        let start = self.data.len();
        let mut header = Vec::with_capacity(MODULE_HEADER_SIZE);
        header.extend_from_slice(&pad_name(name, MODULE_NAME_LEN));
        header.push(major);
        header.push(minor);
        header.extend_from_slice(&(MODULE_HEADER_SIZE as u32).to_le_bytes());
        self.append(&header)?;

        debug!("Created module {} {}.{}", name, major, minor);
        Ok(ModuleWriter::new(self, name, start))
    }

    /// Open a module by name, scanning forward from the cursor
    ///
    /// Returns `None` without moving the cursor when the module is absent.
    pub fn open_module(&mut self, name: &str) -> Result<Option<ModuleReader<'_>>> {
        let info = match self.find_module(name)? {
            Some(info) => info,
            None => return Ok(None),
        };

        debug!(
            "Opened module {} {} ({} bytes)",
            info.name,
            info.version,
            info.payload_size()
        );
        Ok(Some(ModuleReader::new(self, info)))
    }

    fn find_module(&self, name: &str) -> Result<Option<ModuleInfo>> {
        let mut offset = self.cursor;

        while let Some(info) = self.module_at(offset)? {
            if info.name == name {
                return Ok(Some(info));
            }
            offset += info.size;
        }

        Ok(None)
    }

    fn module_at(&self, offset: usize) -> Result<Option<ModuleInfo>> {
        if offset >= self.data.len() {
            return Ok(None);
        }
        if offset + MODULE_HEADER_SIZE > self.data.len() {
            return Err(SnapshotError::malformed(format!(
                "Truncated module header at offset {}",
                offset
            )));
        }

        let header = &self.data[offset..offset + MODULE_HEADER_SIZE];
        let name = unpad_name(&header[..MODULE_NAME_LEN]);
        let version = ModuleVersion::new(header[MODULE_NAME_LEN], header[MODULE_NAME_LEN + 1]);
        let size = u32::from_le_bytes([header[18], header[19], header[20], header[21]]) as usize;

        if size < MODULE_HEADER_SIZE || offset + size > self.data.len() {
            return Err(SnapshotError::malformed(format!(
                "Module {} at offset {} has invalid size {}",
                name, offset, size
            )));
        }

        Ok(Some(ModuleInfo {
            name,
            version,
            offset,
            size,
        }))
    }

    pub(crate) fn append(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(limit) = self.size_limit {
            if self.data.len() + bytes.len() > limit {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "snapshot storage full",
                )
                .into());
            }
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    pub(crate) fn patch_size(&mut self, start: usize) {
        let size = (self.data.len() - start) as u32;
        self.data[start + 18..start + 22].copy_from_slice(&size.to_le_bytes());
    }

    pub(crate) fn bytes(&self, from: usize, to: usize) -> &[u8] {
        &self.data[from..to]
    }

    pub(crate) fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset;
    }
}

fn pad_name(name: &str, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    let src = name.as_bytes();
    let n = src.len().min(len);
    bytes[..n].copy_from_slice(&src[..n]);
    bytes
}

fn truncate_name(name: &str, len: usize) -> String {
    unpad_name(&pad_name(name, len))
}

fn unpad_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
