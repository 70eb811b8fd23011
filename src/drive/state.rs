/// Per-drive hardware state

use crate::drive::RotationState;
use crate::format::DRIVE_HALFTRACKS_1571;
use crate::image::{DriveMedia, MediaKind, P64Image, SectorImage};

/// Mechanical and electrical state of one physical drive
#[derive(Debug, Clone, PartialEq)]
pub struct Drive {
    /// Clock of the last image attach
    pub attach_clk: u32,
    /// Clock of the last image detach
    pub detach_clk: u32,
    /// Clock of the last detach followed by an attach
    pub attach_detach_clk: u32,
    /// Byte-ready line level
    pub byte_ready_level: u8,
    /// Byte-ready edge latch
    pub byte_ready_edge: bool,
    /// Byte-ready output enabled
    pub byte_ready_active: bool,
    /// Head position in half-tracks
    pub current_half_track: u16,
    /// Disk side under the head (0 or 1)
    pub side: u8,
    /// Policy for extending images past their last track
    pub extend_image_policy: u8,
    /// Head offset within the current GCR track
    pub gcr_head_offset: u32,
    /// Next value read from disk
    pub gcr_read: u8,
    /// Next value written to disk
    pub gcr_write_value: u8,
    /// Write protection
    pub read_only: bool,
    /// Offset into the rotation speed table
    pub rotation_table_offset: u32,
    /// Rotation emulation counters
    pub rotation: RotationState,
    /// Active disk content
    pub media: DriveMedia,
    /// Flux image object, allocated with the drive
    pub p64: Option<P64Image>,
}

impl Default for Drive {
    fn default() -> Self {
        Self::new()
    }
}

impl Drive {
    /// Create an idle drive with an empty flux image
    pub fn new() -> Self {
        Self {
            attach_clk: 0,
            detach_clk: 0,
            attach_detach_clk: 0,
            byte_ready_level: 1,
            byte_ready_edge: true,
            byte_ready_active: false,
            current_half_track: 36,
            side: 0,
            extend_image_policy: 0,
            gcr_head_offset: 0,
            gcr_read: 0,
            gcr_write_value: 0x55,
            read_only: false,
            rotation_table_offset: 0,
            rotation: RotationState::default(),
            media: DriveMedia::None,
            p64: Some(P64Image::new()),
        }
    }

    /// Half-track word with the side folded in
    ///
    /// Wraps at 16 bits like the stored word.
    pub fn half_track_word(&self) -> u16 {
        let word = self.current_half_track as u32 + self.side as u32 * DRIVE_HALFTRACKS_1571 as u32;
        word as u16
    }

    /// Move the head
    pub fn set_half_track(&mut self, half_track: u16, side: u8) {
        self.current_half_track = half_track;
        self.side = side;
    }

    /// Kind of the active disk content
    pub fn media_kind(&self) -> MediaKind {
        self.media.kind()
    }

    /// Check whether GCR or flux content is active
    pub fn is_gcr_loaded(&self) -> bool {
        self.media.is_gcr_loaded()
    }

    /// Attached flat image, if any
    pub fn flat_image(&self) -> Option<&SectorImage> {
        self.media.flat_image()
    }

    /// Attach a flat image, replacing any other content
    pub fn attach_image(&mut self, image: SectorImage) {
        self.media = DriveMedia::Flat(image);
    }

    /// Detach whatever disk is attached and empty the flux image
    ///
    /// Returns the media that was active.
    pub fn detach_image(&mut self) -> DriveMedia {
        if let Some(p64) = self.p64.as_mut() {
            p64.clear();
        }
        std::mem::take(&mut self.media)
    }
}
