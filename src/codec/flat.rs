/// Flat sector codec: IMAGE and NOIMAGE modules
///
/// An IMAGE module holds the image type tag followed by every sector in
/// ascending (track, sector) order. The stream needs no geometry: it runs
/// until sector 0 of a track is missing.

use crate::container::{ModuleReader, ModuleWriter, Snapshot};
use crate::drive::{DiskUnit, DriveType};
use crate::error::{Result, SnapshotError};
use crate::format::constants::*;
use crate::format::{ImageType, IMAGE_VERSIONS};
use crate::image::SectorImage;
use log::{debug, error, info};

/// Write the unit's flat image, or a NOIMAGE marker when there is none
pub fn write_image_module(snapshot: &mut Snapshot, unit: &DiskUnit) -> Result<()> {
    let image = match unit.drive.flat_image() {
        Some(image) if unit.unit_type.uses_sector_images() => image,
        _ => {
            let name = noimage_module_name(unit.index);
            return snapshot
                .create_module(&name, IMAGE_SNAP_MAJOR, IMAGE_SNAP_MINOR)?
                .close();
        }
    };

    let name = image_module_name(unit.index);
    let mut module = snapshot.create_module(&name, IMAGE_SNAP_MAJOR, IMAGE_SNAP_MINOR)?;
    module.write_u16(image.image_type().tag())?;
    let sectors = write_sectors(&mut module, image)?;
    module.close()?;

    debug!("Unit #{}: wrote {} sectors of {} image", unit.address(), sectors, image.image_type());
    Ok(())
}

fn write_sectors(module: &mut ModuleWriter<'_>, image: &SectorImage) -> Result<usize> {
    let mut written = 0;
    for track in 1..=u8::MAX {
        let mut sector = 0u8;
        while let Ok(data) = image.read_sector(track, sector) {
            module.write_bytes(data)?;
            written += 1;
            sector += 1;
        }
        if sector == 0 {
            break;
        }
    }
    Ok(written)
}

/// Restore the unit's flat image from IMAGE or NOIMAGE
///
/// Returns whether either module was present.
pub fn read_image_module(snapshot: &mut Snapshot, unit: &mut DiskUnit) -> Result<bool> {
    let noimage = noimage_module_name(unit.index);
    if let Some(module) = snapshot.open_module(&noimage)? {
        module.close();
        if unit.unit_type != DriveType::CmdHd {
            unit.drive.detach_image();
        }
        unit.secondary_image = None;
        debug!("Unit #{}: no flat image in snapshot", unit.address());
        return Ok(true);
    }

    let name = image_module_name(unit.index);
    let mut module = match snapshot.open_module(&name)? {
        Some(module) => module,
        None => return Ok(false),
    };
    IMAGE_VERSIONS.check(&name, module.version())?;

    let tag = module.read_u16()?;
    let image_type = ImageType::from_tag(tag).ok_or_else(|| {
        error!("Snapshot of disk image unknown (type {})", tag);
        SnapshotError::malformed(format!("Unknown disk image type {}", tag))
    })?;

    let geometry = match image_type {
        ImageType::D90 => unit
            .drive
            .flat_image()
            .map(|attached| attached.geometry().clone())
            .ok_or_else(|| {
                SnapshotError::malformed("Image type 9000 needs an attached image for its geometry")
            })?,
        other => other.default_geometry(),
    };

    let mut image = SectorImage::try_blank(image_type, geometry)?;
    read_sectors(&mut module, &mut image)?;
    module.close();

    image.rebuild_bam()?;
    unit.drive.attach_image(image);
    info!("Disk image unit #{} imported from snapshot", unit.address());
    Ok(true)
}

fn read_sectors(module: &mut ModuleReader<'_>, image: &mut SectorImage) -> Result<()> {
    let mut buf = [0u8; SECTOR_SIZE];
    for track in 1..=u8::MAX {
        let mut sector = 0u8;
        while image.read_sector(track, sector).is_ok() {
            module.read_bytes(&mut buf)?;
            image.write_sector(track, sector, &buf)?;
            sector += 1;
        }
        if sector == 0 {
            break;
        }
    }
    Ok(())
}
