/*!
# drivesnap

Save and restore the complete state of emulated Commodore disk drive units in
VICE-compatible snapshot containers.

## Features

- Versioned snapshot container with named modules and scoped readers/writers
- DRIVE module with every historical per-unit layout from 1.0 onwards
- Flat sector (D81, D80, D82, D90), GCR half-track and P64 flux image codecs
- Two-phase restore: decode into staged records, then rebuild live configuration
- Host hooks for CPU, machine, ROM, bus and UI collaborators

## Quick Start

```rust
use drivesnap::{read_drive_snapshot, write_drive_snapshot};
use drivesnap::{DiskUnits, DriveType, NullHost, ResourceStore, Snapshot};

let mut units = DiskUnits::new();
units[0] = units[0].clone().with_type(DriveType::D1541);
let mut resources = ResourceStore::new();

// Save every unit, including disk images
let mut snapshot = Snapshot::create("C64");
write_drive_snapshot(&mut snapshot, &mut units, &mut NullHost, &resources, true, false)?;

// Restore into a fresh set of units
let mut snapshot = Snapshot::from_bytes(snapshot.into_bytes())?;
let mut restored = DiskUnits::new();
let report = read_drive_snapshot(&mut snapshot, &mut restored, &mut NullHost, &mut resources)?;

assert!(report.true_emulation());
assert_eq!(restored[0].unit_type, DriveType::D1541);
assert!(restored[0].enabled);
# Ok::<(), drivesnap::SnapshotError>(())
```

## Modules

- `container`: snapshot file and module framing
- `format`: module names, versions, geometries and the DRIVE field layouts
- `drive`: disk units, drive models and per-drive hardware state
- `image`: disk media (flat sectors, GCR tracks, flux pulses)
- `io`: P64 flux stream encoding
- `codec`: per-unit image modules
- `orchestrator`: full save and restore sequences
- `host`, `resources`: emulator collaborators
- `error`: Error types and Result alias
*/

#![warn(missing_docs)]

/// Per-unit image modules
pub mod codec;
/// Snapshot container and module framing
pub mod container;
/// Disk units, drive models and hardware state
pub mod drive;
/// Error types and Result alias
pub mod error;
/// Module names, versions, geometries and field layouts
pub mod format;
/// Emulator collaborator hooks
pub mod host;
/// Disk media
pub mod image;
/// P64 flux stream encoding
pub mod io;
/// Save and restore sequences
pub mod orchestrator;
/// Configuration resources
pub mod resources;

// Re-export common types
pub use container::{ModuleInfo, ModuleReader, ModuleWriter, Snapshot};
pub use drive::{CpuFamily, DiskUnit, DiskUnits, Drive, DriveType, LedColor, RotationState};
pub use error::{Result, SnapshotError};
pub use format::{Geometry, ImageType, ModuleVersion, VersionRange};
pub use host::{DriveHost, NullHost};
pub use image::{DriveMedia, GcrImage, MediaKind, P64Image, Pulse, SectorImage, SectorImageBuilder};
pub use orchestrator::{
    decode, read_drive_snapshot, reconstruct, write_drive_snapshot, RestoreReport, StagedState,
    StagedUnit,
};
pub use resources::{ResourceStore, Resources};
