use super::reconstruct::{apply_positions, reconstruct};
use super::stage::StagedState;
use super::write::VIRTUAL_FIRST_UNIT_TDE;
use crate::codec::read_unit_image;
use crate::container::{ModuleReader, Snapshot};
use crate::drive::DiskUnits;
use crate::error::{Result, SnapshotError};
use crate::format::layout::layout_for;
use crate::format::{
    gcrimage_module_name, image_module_name, noimage_module_name, p64image_module_name,
    ModuleVersion, DRIVE_MODULE, DRIVE_VERSIONS, FIRST_UNIT_ADDRESS,
};
use crate::host::DriveHost;
use crate::resources::{Resources, DRIVE_TRUE_EMULATION, MACHINE_VIDEO_STANDARD};
use log::{debug, warn};

/// Outcome of a successful restore
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Version of the DRIVE module, `None` when true emulation was off
    pub version: Option<ModuleVersion>,
    /// Timing factor restored into the machine video standard
    pub sync_factor: Option<u32>,
    /// Units enabled after reconstruction
    pub enabled_units: usize,
    /// Image modules restored across all units
    pub images_restored: usize,
}

impl RestoreReport {
    /// Check whether drive state was restored
    pub fn true_emulation(&self) -> bool {
        self.version.is_some()
    }
}

/// Decode the DRIVE module into staged records
///
/// Records start as copies of the live units so fields missing from an older
/// layout keep their current values. The live units are never modified.
/// Returns `None` when the module is absent.
pub fn decode(snapshot: &mut Snapshot, units: &DiskUnits) -> Result<Option<StagedState>> {
    let mut module = match snapshot.open_module(DRIVE_MODULE)? {
        Some(module) => module,
        None => return Ok(None),
    };

    let version = module.version();
    DRIVE_VERSIONS.check(DRIVE_MODULE, version)?;
    let layout = layout_for(version).ok_or_else(|| {
        SnapshotError::older(DRIVE_MODULE, version.major, version.minor)
    })?;
    debug!("Decoding {} module with the {} layout", DRIVE_MODULE, layout.version);

    let sync_factor = module.read_u32()?;
    let mut staged = StagedState::from_units(version, sync_factor, units);
    for record in staged.units.iter_mut() {
        layout.decode(&mut module, record)?;
    }

    read_trailing_fields(&mut module, &mut staged);
    module.close();

    Ok(Some(staged))
}

/// Read the attach-detach clocks and byte-ready flags appended after the records
///
/// Containers written before these fields existed end early; missing values
/// default to zero.
fn read_trailing_fields(module: &mut ModuleReader<'_>, staged: &mut StagedState) {
    let mut complete = true;
    for record in staged.units.iter_mut() {
        record.attach_detach_clk = match module.read_u32() {
            Ok(value) => value,
            Err(_) => {
                complete = false;
                0
            }
        };
    }
    if !complete {
        warn!("{} module has no attach-detach clocks, defaulting to 0", DRIVE_MODULE);
    }

    let mut complete = true;
    for record in staged.units.iter_mut() {
        match (module.read_u8(), module.read_u8()) {
            (Ok(edge), Ok(active)) => {
                record.byte_ready_edge = edge != 0;
                record.byte_ready_active = active != 0;
            }
            _ => {
                complete = false;
                record.byte_ready_edge = false;
                record.byte_ready_active = false;
            }
        }
    }
    if !complete {
        warn!("{} module has no byte-ready flags, defaulting to off", DRIVE_MODULE);
    }
}

/// Reject a container holding more than one image module for a unit
fn check_image_modules(snapshot: &Snapshot, units: &DiskUnits) -> Result<()> {
    let modules = snapshot.modules()?;
    for unit in units.iter() {
        let names = [
            noimage_module_name(unit.index),
            image_module_name(unit.index),
            gcrimage_module_name(unit.index),
            p64image_module_name(unit.index),
        ];
        let found: Vec<&str> = modules
            .iter()
            .filter(|m| names.contains(&m.name))
            .map(|m| m.name.as_str())
            .collect();
        if found.len() > 1 {
            return Err(SnapshotError::malformed(format!(
                "Unit #{} has {} image modules: {}",
                unit.address(),
                found.len(),
                found.join(", ")
            )));
        }
    }
    Ok(())
}

/// Restore every disk unit from the snapshot
///
/// A container without a DRIVE module was saved with true drive emulation
/// off; the resource is switched off and an empty report returned. A version
/// or structure error before reconstruction leaves the units untouched.
pub fn read_drive_snapshot<H, R>(
    snapshot: &mut Snapshot,
    units: &mut DiskUnits,
    host: &mut H,
    resources: &mut R,
) -> Result<RestoreReport>
where
    H: DriveHost + ?Sized,
    R: Resources + ?Sized,
{
    let true_emulation = snapshot.contains_module(DRIVE_MODULE)?;
    let first_unit = if true_emulation {
        VIRTUAL_FIRST_UNIT_TDE
    } else {
        FIRST_UNIT_ADDRESS
    };
    host.read_virtual_drives(snapshot, first_unit)?;

    if !true_emulation {
        debug!("No {} module, true drive emulation off", DRIVE_MODULE);
        resources.set_int(DRIVE_TRUE_EMULATION, 0);
        return Ok(RestoreReport::default());
    }

    host.gcr_writeback_all(units);

    let staged = match decode(snapshot, units)? {
        Some(staged) => staged,
        None => {
            resources.set_int(DRIVE_TRUE_EMULATION, 0);
            return Ok(RestoreReport::default());
        }
    };
    check_image_modules(snapshot, units)?;
    resources.set_int(DRIVE_TRUE_EMULATION, 1);

    reconstruct(&staged, units, host, resources)?;

    host.clear_parallel_cables();
    for unit in units.iter_mut().filter(|u| u.enabled) {
        let family = unit.unit_type.cpu_family();
        host.read_cpu_module(snapshot, unit, family)?;
        host.read_machine_module(snapshot, unit)?;
    }

    let mut images_restored = 0;
    for unit in units.iter_mut() {
        images_restored += read_unit_image(snapshot, unit)?;
    }

    for unit in units.iter_mut() {
        host.read_rom_module(snapshot, unit)?;
    }

    apply_positions(&staged, units);

    host.stop_drive_sound();
    host.update_iec_ports();
    host.update_ui_status(units);

    resources.set_int(MACHINE_VIDEO_STANDARD, staged.sync_factor as i32);

    Ok(RestoreReport {
        version: Some(staged.version),
        sync_factor: Some(staged.sync_factor),
        enabled_units: units.iter().filter(|u| u.enabled).count(),
        images_restored,
    })
}
