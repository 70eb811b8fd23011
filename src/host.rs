/// Emulator collaborators invoked while saving and restoring drives
///
/// The snapshot engine owns drive state only. CPU cores, machine-specific
/// drive glue, ROMs, the bus and the UI live behind [`DriveHost`]; every
/// method defaults to a no-op so a host implements only what it has.

use crate::container::Snapshot;
use crate::drive::{CpuFamily, DiskUnit, DiskUnits};
use crate::error::Result;

/// Hooks into the surrounding emulator
#[allow(unused_variables)]
pub trait DriveHost {
    /// Flush pending GCR writes back to the attached images
    fn gcr_writeback_all(&mut self, units: &mut DiskUnits) {}

    /// Write the virtual (non true-emulation) drive marker module
    fn write_virtual_drives(&mut self, snapshot: &mut Snapshot, first_unit: u8) -> Result<()> {
        Ok(())
    }

    /// Read the virtual drive marker module
    fn read_virtual_drives(&mut self, snapshot: &mut Snapshot, first_unit: u8) -> Result<()> {
        Ok(())
    }

    /// Write the drive CPU module
    fn write_cpu_module(
        &mut self,
        snapshot: &mut Snapshot,
        unit: &DiskUnit,
        family: CpuFamily,
    ) -> Result<()> {
        Ok(())
    }

    /// Read the drive CPU module
    fn read_cpu_module(
        &mut self,
        snapshot: &mut Snapshot,
        unit: &mut DiskUnit,
        family: CpuFamily,
    ) -> Result<()> {
        Ok(())
    }

    /// Write the machine-specific drive module
    fn write_machine_module(&mut self, snapshot: &mut Snapshot, unit: &DiskUnit) -> Result<()> {
        Ok(())
    }

    /// Read the machine-specific drive module
    fn read_machine_module(&mut self, snapshot: &mut Snapshot, unit: &mut DiskUnit) -> Result<()> {
        Ok(())
    }

    /// Write the drive ROM module
    fn write_rom_module(&mut self, snapshot: &mut Snapshot, unit: &DiskUnit) -> Result<()> {
        Ok(())
    }

    /// Read the drive ROM module
    fn read_rom_module(&mut self, snapshot: &mut Snapshot, unit: &mut DiskUnit) -> Result<()> {
        Ok(())
    }

    /// Select the ROM image for the unit's model
    fn setup_rom_image(&mut self, unit: &DiskUnit) {}

    /// Build the unit's memory map
    fn init_drive_memory(&mut self, unit: &DiskUnit) {}

    /// Install execution traps on the unit's ROM routines
    fn install_rom_traps(&mut self, unit: &DiskUnit) {}

    /// Report a drive present or absent at a bus address
    fn set_bus_drive_present(&mut self, address: u8, present: bool) {}

    /// Release every parallel cable line
    fn clear_parallel_cables(&mut self) {}

    /// Stop drive sound effects
    fn stop_drive_sound(&mut self) {}

    /// Recompute the IEC bus port lines
    fn update_iec_ports(&mut self) {}

    /// Refresh drive LEDs and status display
    fn update_ui_status(&mut self, units: &DiskUnits) {}
}

/// Host that ignores every hook
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl DriveHost for NullHost {}
