/// Disk unit slots

use crate::drive::{Drive, DriveType, LedColor};
use crate::format::{FIRST_UNIT_ADDRESS, NUM_DISK_UNITS};
use crate::image::SectorImage;
use std::ops::{Index, IndexMut};

/// One disk unit slot on the serial bus
#[derive(Debug, Clone, PartialEq)]
pub struct DiskUnit {
    /// Slot index (0 for address 8)
    pub index: usize,
    /// Whether the unit is emulated
    pub enabled: bool,
    /// Hardware model
    pub unit_type: DriveType,
    /// CPU clock multiplier
    pub clock_frequency: u8,
    /// Idling method of the drive CPU
    pub idling_method: u8,
    /// Parallel cable type
    pub parallel_cable: u8,
    /// The unit's drive
    pub drive: Drive,
    /// Image in the second image slot
    pub secondary_image: Option<SectorImage>,
    /// Activity LED colour, derived from the model
    pub led_color: LedColor,
    /// Whether ROM execution traps are installed
    pub rom_traps_installed: bool,
}

impl DiskUnit {
    /// Create an empty slot
    pub fn new(index: usize) -> Self {
        Self {
            index,
            enabled: false,
            unit_type: DriveType::None,
            clock_frequency: 1,
            idling_method: 0,
            parallel_cable: 0,
            drive: Drive::new(),
            secondary_image: None,
            led_color: LedColor::Red,
            rom_traps_installed: false,
        }
    }

    /// Fit a drive model, enabling the unit unless the model is `None`
    pub fn with_type(mut self, unit_type: DriveType) -> Self {
        self.unit_type = unit_type;
        self.enabled = unit_type.is_present();
        self.led_color = unit_type.led_color();
        self
    }

    /// Bus address of the unit
    pub fn address(&self) -> u8 {
        FIRST_UNIT_ADDRESS + self.index as u8
    }
}

/// The full set of disk unit slots
#[derive(Debug, Clone, PartialEq)]
pub struct DiskUnits {
    units: Vec<DiskUnit>,
}

impl Default for DiskUnits {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskUnits {
    /// Create all slots empty
    pub fn new() -> Self {
        Self {
            units: (0..NUM_DISK_UNITS).map(DiskUnit::new).collect(),
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Always false; the slot count is fixed
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterate over the slots
    pub fn iter(&self) -> std::slice::Iter<'_, DiskUnit> {
        self.units.iter()
    }

    /// Iterate mutably over the slots
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, DiskUnit> {
        self.units.iter_mut()
    }

    /// Look up a slot by bus address
    pub fn by_address(&self, address: u8) -> Option<&DiskUnit> {
        self.units.iter().find(|u| u.address() == address)
    }
}

impl Index<usize> for DiskUnits {
    type Output = DiskUnit;

    fn index(&self, index: usize) -> &DiskUnit {
        &self.units[index]
    }
}

impl IndexMut<usize> for DiskUnits {
    fn index_mut(&mut self, index: usize) -> &mut DiskUnit {
        &mut self.units[index]
    }
}
