/// Container framing, module names and disk geometry constants

/// Snapshot file signature
pub const SNAPSHOT_MAGIC: &[u8] = b"VICE Snapshot File\x1a";

/// Container format major version
pub const SNAPSHOT_MAJOR: u8 = 2;

/// Container format minor version
pub const SNAPSHOT_MINOR: u8 = 0;

/// Length of the machine name field in the file header
pub const MACHINE_NAME_LEN: usize = 16;

/// Size of the file header
pub const SNAPSHOT_HEADER_SIZE: usize = SNAPSHOT_MAGIC.len() + 2 + MACHINE_NAME_LEN;

/// Length of the name field in a module header
pub const MODULE_NAME_LEN: usize = 16;

/// Size of a module header (name, major, minor, size)
pub const MODULE_HEADER_SIZE: usize = MODULE_NAME_LEN + 1 + 1 + 4;

/// Number of disk unit slots
pub const NUM_DISK_UNITS: usize = 4;

/// Bus address of the first disk unit
pub const FIRST_UNIT_ADDRESS: u8 = 8;

/// Drive-unit hardware state module
pub const DRIVE_MODULE: &str = "DRIVE";
/// Current DRIVE module major version
pub const DRIVE_SNAP_MAJOR: u8 = 1;
/// Current DRIVE module minor version
pub const DRIVE_SNAP_MINOR: u8 = 5;

/// Flat sector image module versions (NOIMAGE and IMAGE share them)
pub const IMAGE_SNAP_MAJOR: u8 = 1;
/// Flat sector image minor version
pub const IMAGE_SNAP_MINOR: u8 = 0;

/// GCR track image major version
pub const GCRIMAGE_SNAP_MAJOR: u8 = 3;
/// GCR track image minor version
pub const GCRIMAGE_SNAP_MINOR: u8 = 1;

/// P64 flux image major version
pub const P64IMAGE_SNAP_MAJOR: u8 = 1;
/// P64 flux image minor version
pub const P64IMAGE_SNAP_MINOR: u8 = 0;

/// Half-tracks per side on a 1570/1571, used to fold the side into the half-track word
pub const DRIVE_HALFTRACKS_1571: u16 = 70;

/// Maximum number of tracks on a 1571 side
pub const MAX_TRACKS_1571: usize = 84;

/// Number of GCR half-track slots
pub const MAX_GCR_HALFTRACKS: usize = MAX_TRACKS_1571 * 2;

/// Largest GCR track buffer accepted from a snapshot
pub const MAX_GCR_TRACK_BYTES: usize = 65536;

/// Bytes per sector in flat images
pub const SECTOR_SIZE: usize = 256;

/// D81 (1581) image size
pub const D81_FILE_SIZE: usize = 819_200;

/// D80 (8050) image size
pub const D80_FILE_SIZE: usize = 533_248;

/// D82 (8250) image size
pub const D82_FILE_SIZE: usize = 1_066_496;

/// Flux pulse positions per disk rotation
pub const P64_SAMPLES_PER_ROTATION: u32 = 3_200_000;

/// Signature of a serialised flux image
pub const P64_SIGNATURE: &[u8; 8] = b"P64-1541";

/// Serialised flux image version
pub const P64_STREAM_VERSION: u32 = 0;

/// Flux image flag: disk is write protected
pub const P64_FLAG_WRITE_PROTECT: u32 = 0x0000_0001;

/// Prefix of a half-track pulse chunk; the fourth byte is the half-track
pub const P64_TRACK_CHUNK: &[u8; 3] = b"HTP";

/// Terminating chunk of a flux image stream
pub const P64_DONE_CHUNK: &[u8; 4] = b"DONE";

/// Name of the "no flat image" marker module for a unit
pub fn noimage_module_name(unit: usize) -> String {
    format!("NOIMAGE{}", unit)
}

/// Name of the flat image module for a unit
pub fn image_module_name(unit: usize) -> String {
    format!("IMAGE{}", unit)
}

/// Name of the GCR image module for a unit
pub fn gcrimage_module_name(unit: usize) -> String {
    format!("GCRIMAGE{}", unit)
}

/// Name of the P64 image module for a unit
pub fn p64image_module_name(unit: usize) -> String {
    format!("P64IMAGE{}", unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_names() {
        assert_eq!(noimage_module_name(0), "NOIMAGE0");
        assert_eq!(image_module_name(1), "IMAGE1");
        assert_eq!(gcrimage_module_name(2), "GCRIMAGE2");
        assert_eq!(p64image_module_name(3), "P64IMAGE3");
    }

    #[test]
    fn test_geometry_sizes() {
        assert_eq!(D81_FILE_SIZE, 80 * 40 * SECTOR_SIZE);
        assert_eq!(D82_FILE_SIZE, 2 * D80_FILE_SIZE);
        assert_eq!(MAX_GCR_HALFTRACKS, 168);
    }

    #[test]
    fn test_header_sizes() {
        assert_eq!(SNAPSHOT_HEADER_SIZE, 19 + 2 + 16);
        assert_eq!(MODULE_HEADER_SIZE, 22);
    }
}
