/// P64 flux codec: P64IMAGE modules
///
/// Layout: size of the serialised flux image (DW), then the serialised bytes.

use crate::container::Snapshot;
use crate::drive::DiskUnit;
use crate::error::{Result, SnapshotError};
use crate::format::constants::*;
use crate::format::P64IMAGE_VERSIONS;
use crate::image::DriveMedia;
use log::debug;
use std::io::Cursor;

/// Write the unit's flux image
///
/// The image is serialised before the module is created, so a failure leaves
/// no module behind.
pub fn write_p64image_module(snapshot: &mut Snapshot, unit: &DiskUnit) -> Result<()> {
    let p64 = unit.drive.p64.as_ref().ok_or_else(|| {
        SnapshotError::flux(format!("Unit #{} has no flux image", unit.address()))
    })?;
    let bytes = p64.to_bytes()?;

    let name = p64image_module_name(unit.index);
    let mut module = snapshot.create_module(&name, P64IMAGE_SNAP_MAJOR, P64IMAGE_SNAP_MINOR)?;
    module.write_u32(bytes.len() as u32)?;
    module.write_bytes(&bytes)?;
    module.close()?;

    debug!("Unit #{}: wrote {} byte flux image", unit.address(), bytes.len());
    Ok(())
}

/// Restore the unit's flux image into its existing flux object
///
/// Returns whether the module was present.
pub fn read_p64image_module(snapshot: &mut Snapshot, unit: &mut DiskUnit) -> Result<bool> {
    let name = p64image_module_name(unit.index);
    let mut module = match snapshot.open_module(&name)? {
        Some(module) => module,
        None => return Ok(false),
    };

    let address = unit.address();
    let p64 = unit
        .drive
        .p64
        .as_mut()
        .ok_or_else(|| SnapshotError::flux(format!("Unit #{} has no flux image", address)))?;
    P64IMAGE_VERSIONS.check(&name, module.version())?;

    let size = module.read_u32()? as usize;
    let bytes = module.read_vec(size)?;
    module.close();

    p64.read_from(&mut Cursor::new(bytes))?;
    debug!("Unit #{}: restored {} flux pulses", address, p64.pulse_count());

    unit.drive.media = DriveMedia::Flux;
    Ok(true)
}
