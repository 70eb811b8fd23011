/// Sub-image codecs, one per disk content representation

/// Flat sector images
pub mod flat;
/// GCR half-track images
pub mod gcr;
/// P64 flux images
pub mod p64;

pub use flat::{read_image_module, write_image_module};
pub use gcr::{read_gcrimage_module, write_gcrimage_module};
pub use p64::{read_p64image_module, write_p64image_module};

use crate::container::Snapshot;
use crate::drive::DiskUnit;
use crate::error::Result;
use crate::image::MediaKind;

/// Write the image module matching the unit's active media
pub fn write_unit_image(snapshot: &mut Snapshot, unit: &DiskUnit) -> Result<()> {
    match unit.drive.media_kind() {
        MediaKind::Gcr => write_gcrimage_module(snapshot, unit),
        MediaKind::Flux => write_p64image_module(snapshot, unit),
        MediaKind::Flat | MediaKind::None => write_image_module(snapshot, unit),
    }
}

/// Try every image reader for a unit, flat first, then GCR, then P64
///
/// Returns how many image modules were found for the unit.
pub fn read_unit_image(snapshot: &mut Snapshot, unit: &mut DiskUnit) -> Result<usize> {
    let mut found = 0;
    if read_image_module(snapshot, unit)? {
        found += 1;
    }
    if read_gcrimage_module(snapshot, unit)? {
        found += 1;
    }
    if read_p64image_module(snapshot, unit)? {
        found += 1;
    }
    Ok(found)
}
