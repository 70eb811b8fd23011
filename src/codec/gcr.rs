/// GCR track codec: GCRIMAGE modules
///
/// Layout: half-track count (DW), then per half-track its length (DW)
/// followed by that many raw bytes.

use crate::container::Snapshot;
use crate::drive::DiskUnit;
use crate::error::{Result, SnapshotError};
use crate::format::constants::*;
use crate::format::GCRIMAGE_VERSIONS;
use crate::image::{DriveMedia, GcrImage};
use log::debug;

/// Write the unit's GCR image
pub fn write_gcrimage_module(snapshot: &mut Snapshot, unit: &DiskUnit) -> Result<()> {
    let image = unit.drive.media.gcr_image().ok_or_else(|| {
        SnapshotError::malformed(format!("Unit #{} has no GCR image", unit.address()))
    })?;

    let name = gcrimage_module_name(unit.index);
    let mut module = snapshot.create_module(&name, GCRIMAGE_SNAP_MAJOR, GCRIMAGE_SNAP_MINOR)?;
    module.write_u32(MAX_GCR_HALFTRACKS as u32)?;

    for index in 0..MAX_GCR_HALFTRACKS {
        match image.track(index) {
            Some(data) => {
                module.write_u32(data.len() as u32)?;
                module.write_bytes(data)?;
            }
            None => module.write_u32(0)?,
        }
    }
    module.close()?;

    debug!(
        "Unit #{}: wrote {} GCR half-tracks",
        unit.address(),
        image.loaded_tracks()
    );
    Ok(())
}

/// Restore the unit's GCR image
///
/// The image is decoded in full before it replaces the unit's media, so a
/// rejected module leaves the unit as it was. Returns whether the module was
/// present.
pub fn read_gcrimage_module(snapshot: &mut Snapshot, unit: &mut DiskUnit) -> Result<bool> {
    let name = gcrimage_module_name(unit.index);
    let mut module = match snapshot.open_module(&name)? {
        Some(module) => module,
        None => return Ok(false),
    };
    GCRIMAGE_VERSIONS.check(&name, module.version())?;

    let count = module.read_u32()? as usize;
    if count > MAX_GCR_HALFTRACKS {
        return Err(SnapshotError::malformed(format!(
            "Half-track count {} exceeds {}",
            count, MAX_GCR_HALFTRACKS
        )));
    }

    let mut image = GcrImage::new();
    for index in 0..count {
        let size = module.read_u32()? as usize;
        if size > MAX_GCR_TRACK_BYTES {
            return Err(SnapshotError::malformed(format!(
                "Half-track {} size {} exceeds {}",
                index, size, MAX_GCR_TRACK_BYTES
            )));
        }
        if size > 0 {
            image.set_track(index, Some(module.read_vec(size)?));
        }
    }
    module.close();

    debug!(
        "Unit #{}: restored {} GCR half-tracks",
        unit.address(),
        image.loaded_tracks()
    );
    unit.drive.media = DriveMedia::Gcr(image);
    Ok(true)
}
