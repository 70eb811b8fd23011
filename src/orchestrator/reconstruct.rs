use super::stage::{StagedState, StagedUnit};
use crate::drive::{DiskUnit, DiskUnits, DriveType};
use crate::error::{Result, SnapshotError};
use crate::host::DriveHost;
use crate::resources::{idle_method_resource, Resources};
use log::debug;

/// Apply staged hardware state and derive each unit's live configuration
///
/// Every unit type is validated before any unit is touched. Recognised models
/// are enabled with ROM, memory, traps, LED and bus presence set up; `None`
/// disables the unit and clears its bus address.
///
/// An unknown unit type fails with [`SnapshotError::StateReconstruction`]
/// rather than `MalformedData`: the DRIVE module framing itself was valid.
pub fn reconstruct<H, R>(
    staged: &StagedState,
    units: &mut DiskUnits,
    host: &mut H,
    resources: &mut R,
) -> Result<()>
where
    H: DriveHost + ?Sized,
    R: Resources + ?Sized,
{
    if staged.units.len() != units.len() {
        return Err(SnapshotError::reconstruction(format!(
            "Staged {} units for {} slots",
            staged.units.len(),
            units.len()
        )));
    }

    let types = staged
        .units
        .iter()
        .enumerate()
        .map(|(i, record)| {
            record.unit_type().ok_or_else(|| {
                SnapshotError::reconstruction(format!(
                    "Unit #{} has unknown type {}",
                    units[i].address(),
                    record.unit_type_raw
                ))
            })
        })
        .collect::<Result<Vec<DriveType>>>()?;

    for ((unit, record), unit_type) in units.iter_mut().zip(&staged.units).zip(types) {
        apply_hardware(unit, record, unit_type);

        let address = unit.address();
        if unit_type.is_present() {
            unit.enabled = true;
            host.setup_rom_image(unit);
            host.init_drive_memory(unit);
            resources.set_int(&idle_method_resource(address), unit.idling_method as i32);
            host.install_rom_traps(unit);
            unit.rom_traps_installed = true;
            unit.led_color = unit_type.led_color();
            host.set_bus_drive_present(address, true);
            debug!("Unit #{} reconstructed as {}", address, unit_type);
        } else {
            unit.enabled = false;
            unit.rom_traps_installed = false;
            host.set_bus_drive_present(address, false);
        }
    }

    Ok(())
}

fn apply_hardware(unit: &mut DiskUnit, record: &StagedUnit, unit_type: DriveType) {
    unit.unit_type = unit_type;
    unit.clock_frequency = record.clock_frequency;
    unit.idling_method = record.idling_method;
    unit.parallel_cable = record.parallel_cable;

    let drive = &mut unit.drive;
    drive.byte_ready_level = record.byte_ready_level;
    drive.byte_ready_edge = record.byte_ready_edge;
    drive.byte_ready_active = record.byte_ready_active;
    drive.extend_image_policy = record.extend_image_policy;
    drive.gcr_head_offset = record.gcr_head_offset;
    drive.gcr_read = record.gcr_read;
    drive.gcr_write_value = record.gcr_write_value;
    drive.read_only = record.read_only;
    drive.rotation_table_offset = record.rotation_table_offset;
    drive.rotation = record.rotation.clone();
}

/// Apply the staged clocks and head position
///
/// Runs once the image modules are restored. Clocks are only restored on
/// units with a drive.
pub fn apply_positions(staged: &StagedState, units: &mut DiskUnits) {
    for (unit, record) in units.iter_mut().zip(&staged.units) {
        if unit.unit_type.is_present() {
            unit.drive.attach_clk = record.attach_clk;
            unit.drive.detach_clk = record.detach_clk;
            unit.drive.attach_detach_clk = record.attach_detach_clk;
        }

        let (half_track, side) = record.half_track_and_side(unit.unit_type);
        unit.drive.set_half_track(half_track, side);
    }
}
