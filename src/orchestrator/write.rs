use super::stage::StagedUnit;
use crate::codec::write_unit_image;
use crate::container::Snapshot;
use crate::drive::DiskUnits;
use crate::error::Result;
use crate::format::layout::current_layout;
use crate::format::{DRIVE_MODULE, DRIVE_SNAP_MAJOR, DRIVE_SNAP_MINOR, FIRST_UNIT_ADDRESS};
use crate::host::DriveHost;
use crate::resources::{Resources, DRIVE_TRUE_EMULATION, MACHINE_VIDEO_STANDARD, VIDEO_STANDARD_PAL};
use log::debug;

/// First unit handled by the virtual drive layer when true emulation is on
pub(crate) const VIRTUAL_FIRST_UNIT_TDE: u8 = 10;

/// Save every disk unit into the snapshot
///
/// With true drive emulation off only the virtual drive marker is written.
pub fn write_drive_snapshot<H, R>(
    snapshot: &mut Snapshot,
    units: &mut DiskUnits,
    host: &mut H,
    resources: &R,
    include_disks: bool,
    include_roms: bool,
) -> Result<()>
where
    H: DriveHost + ?Sized,
    R: Resources + ?Sized,
{
    let true_emulation = resources.get_int(DRIVE_TRUE_EMULATION).unwrap_or(0) != 0;
    let first_unit = if true_emulation {
        VIRTUAL_FIRST_UNIT_TDE
    } else {
        FIRST_UNIT_ADDRESS
    };
    host.write_virtual_drives(snapshot, first_unit)?;

    if !true_emulation {
        debug!("True drive emulation off, skipping drive state");
        return Ok(());
    }

    host.gcr_writeback_all(units);

    let sync_factor = resources
        .get_int(MACHINE_VIDEO_STANDARD)
        .unwrap_or(VIDEO_STANDARD_PAL);

    let layout = current_layout();
    let mut module = snapshot.create_module(DRIVE_MODULE, DRIVE_SNAP_MAJOR, DRIVE_SNAP_MINOR)?;
    module.write_u32(sync_factor as u32)?;
    for unit in units.iter() {
        layout.encode(&mut module, &StagedUnit::capture(unit))?;
    }
    for unit in units.iter() {
        module.write_u32(unit.drive.attach_detach_clk)?;
    }
    for unit in units.iter() {
        module.write_u8(unit.drive.byte_ready_edge as u8)?;
        module.write_u8(unit.drive.byte_ready_active as u8)?;
    }
    module.close()?;
    debug!("Wrote {} drive module for {} units", layout.version, units.len());

    for unit in units.iter().filter(|u| u.enabled) {
        host.write_cpu_module(snapshot, unit, unit.unit_type.cpu_family())?;
        host.write_machine_module(snapshot, unit)?;
    }

    if include_disks {
        for unit in units.iter() {
            write_unit_image(snapshot, unit)?;
        }
    }

    if include_roms {
        for unit in units.iter().filter(|u| u.enabled) {
            host.write_rom_module(snapshot, unit)?;
        }
    }

    Ok(())
}
