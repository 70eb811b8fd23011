/// Drive units, hardware models and per-drive state

/// Rotation emulation counters
pub mod rotation;
/// Per-drive hardware state
pub mod state;
/// Unit slots and their collection
pub mod unit;

pub use rotation::RotationState;
pub use state::Drive;
pub use unit::{DiskUnit, DiskUnits};

use std::fmt;

/// Hardware model of a disk unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DriveType {
    /// No drive in this slot
    #[default]
    None,
    /// Commodore 1540
    D1540,
    /// Commodore 1541
    D1541,
    /// Commodore 1541-II
    D1541II,
    /// Commodore 1551
    D1551,
    /// Commodore 1570
    D1570,
    /// Commodore 1571
    D1571,
    /// Commodore 1571 built into the C128DCR
    D1571Cr,
    /// Commodore 1581
    D1581,
    /// CMD FD-2000
    D2000,
    /// CMD FD-4000
    D4000,
    /// CMD HD series
    CmdHd,
    /// Commodore 2031
    D2031,
    /// Commodore 2040
    D2040,
    /// Commodore 3040
    D3040,
    /// Commodore 4040
    D4040,
    /// Commodore SFD-1001
    D1001,
    /// Commodore 8050
    D8050,
    /// Commodore 8250
    D8250,
    /// Commodore D9060/D9090
    D9000,
}

/// Every recognised model, in raw-value order
pub const ALL_DRIVE_TYPES: [DriveType; 20] = [
    DriveType::None,
    DriveType::D1001,
    DriveType::D1540,
    DriveType::D1541,
    DriveType::D1541II,
    DriveType::D1551,
    DriveType::D1570,
    DriveType::D1571,
    DriveType::D1571Cr,
    DriveType::D1581,
    DriveType::D2000,
    DriveType::D2031,
    DriveType::D2040,
    DriveType::D3040,
    DriveType::D4000,
    DriveType::D4040,
    DriveType::CmdHd,
    DriveType::D8050,
    DriveType::D8250,
    DriveType::D9000,
];

impl DriveType {
    /// Decode the raw value stored in the DRIVE module
    pub fn from_raw(raw: u32) -> Option<Self> {
        ALL_DRIVE_TYPES.iter().copied().find(|t| t.raw() == raw)
    }

    /// Raw value stored in the DRIVE module
    pub fn raw(&self) -> u32 {
        match self {
            DriveType::None => 0,
            DriveType::D1540 => 1540,
            DriveType::D1541 => 1541,
            DriveType::D1541II => 1542,
            DriveType::D1551 => 1551,
            DriveType::D1570 => 1570,
            DriveType::D1571 => 1571,
            DriveType::D1571Cr => 1573,
            DriveType::D1581 => 1581,
            DriveType::D2000 => 2000,
            DriveType::D4000 => 4000,
            DriveType::CmdHd => 4844,
            DriveType::D2031 => 2031,
            DriveType::D2040 => 2040,
            DriveType::D3040 => 3040,
            DriveType::D4040 => 4040,
            DriveType::D1001 => 1001,
            DriveType::D8050 => 8050,
            DriveType::D8250 => 8250,
            DriveType::D9000 => 9000,
        }
    }

    /// Check whether this is a real drive
    pub fn is_present(&self) -> bool {
        *self != DriveType::None
    }

    /// Processor family of the drive's CPU
    pub fn cpu_family(&self) -> CpuFamily {
        match self {
            DriveType::D2000 | DriveType::D4000 | DriveType::CmdHd => CpuFamily::Wdc65c02,
            _ => CpuFamily::Mos6502,
        }
    }

    /// Check whether flat sector images are saved for this model
    pub fn uses_sector_images(&self) -> bool {
        *self != DriveType::CmdHd
    }

    /// Check whether the model folds a second side into the half-track word
    pub fn is_double_sided_gcr(&self) -> bool {
        matches!(self, DriveType::D1570 | DriveType::D1571 | DriveType::D1571Cr)
    }

    /// Colour of the activity LED
    pub fn led_color(&self) -> LedColor {
        match self {
            DriveType::D1581 | DriveType::D2000 | DriveType::D4000 => LedColor::Green,
            _ => LedColor::Red,
        }
    }
}

impl fmt::Display for DriveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveType::None => write!(f, "none"),
            DriveType::D1541II => write!(f, "1541-II"),
            DriveType::D1571Cr => write!(f, "1571CR"),
            DriveType::CmdHd => write!(f, "CMD-HD"),
            other => write!(f, "{}", other.raw()),
        }
    }
}

/// Processor family of a drive CPU, selecting the CPU snapshot module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuFamily {
    /// NMOS 6502
    Mos6502,
    /// CMOS 65C02
    Wdc65c02,
}

/// Activity LED colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LedColor {
    /// Red LED
    #[default]
    Red,
    /// Green LED
    Green,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_values_round_trip() {
        for t in ALL_DRIVE_TYPES {
            assert_eq!(DriveType::from_raw(t.raw()), Some(t));
        }
    }

    #[test]
    fn test_unknown_raw_value() {
        assert_eq!(DriveType::from_raw(1234), None);
        assert_eq!(DriveType::from_raw(1542), Some(DriveType::D1541II));
        assert_eq!(DriveType::from_raw(1573), Some(DriveType::D1571Cr));
        assert_eq!(DriveType::from_raw(4844), Some(DriveType::CmdHd));
    }

    #[test]
    fn test_cpu_family() {
        assert_eq!(DriveType::D1541.cpu_family(), CpuFamily::Mos6502);
        assert_eq!(DriveType::D2000.cpu_family(), CpuFamily::Wdc65c02);
        assert_eq!(DriveType::CmdHd.cpu_family(), CpuFamily::Wdc65c02);
    }

    #[test]
    fn test_led_color() {
        assert_eq!(DriveType::D1581.led_color(), LedColor::Green);
        assert_eq!(DriveType::D1541.led_color(), LedColor::Red);
    }

    #[test]
    fn test_display() {
        assert_eq!(DriveType::D1541II.to_string(), "1541-II");
        assert_eq!(DriveType::D8250.to_string(), "8250");
    }
}
