/// Snapshot format definitions

/// Container framing, module names and geometry constants
pub mod constants;
/// Flat image types and geometries
pub mod geometry;
/// Per-unit field layout table for the DRIVE module
pub mod layout;

pub use constants::*;
pub use geometry::{Geometry, ImageType, SectorLayout};
pub use layout::{Field, FieldRecord, Layout, Width};

use crate::error::{Result, SnapshotError};
use std::fmt;

/// Module version, ordered by major then minor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleVersion {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
}

impl ModuleVersion {
    /// Create a new version
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Range of versions a module reader accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    /// Oldest accepted version
    pub oldest: ModuleVersion,
    /// Newest accepted version (always the one written)
    pub newest: ModuleVersion,
}

impl VersionRange {
    /// Range accepting exactly one version
    pub const fn exact(major: u8, minor: u8) -> Self {
        Self {
            oldest: ModuleVersion::new(major, minor),
            newest: ModuleVersion::new(major, minor),
        }
    }

    /// Reject a version outside this range
    pub fn check(&self, module: &str, found: ModuleVersion) -> Result<()> {
        if found > self.newest {
            return Err(SnapshotError::newer(module, found.major, found.minor));
        }
        if found < self.oldest {
            return Err(SnapshotError::older(module, found.major, found.minor));
        }
        Ok(())
    }
}

/// Versions accepted for the DRIVE module
pub const DRIVE_VERSIONS: VersionRange = VersionRange {
    oldest: ModuleVersion::new(1, 0),
    newest: ModuleVersion::new(DRIVE_SNAP_MAJOR, DRIVE_SNAP_MINOR),
};

/// Versions accepted for the IMAGE and NOIMAGE modules
pub const IMAGE_VERSIONS: VersionRange = VersionRange::exact(IMAGE_SNAP_MAJOR, IMAGE_SNAP_MINOR);

/// Versions accepted for the GCRIMAGE module
pub const GCRIMAGE_VERSIONS: VersionRange =
    VersionRange::exact(GCRIMAGE_SNAP_MAJOR, GCRIMAGE_SNAP_MINOR);

/// Versions accepted for the P64IMAGE module
pub const P64IMAGE_VERSIONS: VersionRange =
    VersionRange::exact(P64IMAGE_SNAP_MAJOR, P64IMAGE_SNAP_MINOR);
