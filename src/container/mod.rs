/// Snapshot container: a file header followed by named, versioned modules

/// Scoped module reader and writer
pub mod module;
/// Container and module directory
pub mod snapshot;

pub use module::{ModuleReader, ModuleWriter};
pub use snapshot::Snapshot;

use crate::format::ModuleVersion;

/// Directory entry for one module in a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Module name
    pub name: String,
    /// Module version
    pub version: ModuleVersion,
    /// Byte offset of the module header
    pub offset: usize,
    /// Total size including the header
    pub size: usize,
}

impl ModuleInfo {
    /// Size of the payload after the header
    pub fn payload_size(&self) -> usize {
        self.size
            .saturating_sub(crate::format::MODULE_HEADER_SIZE)
    }
}
