/// Flat image types and their disk geometries

use crate::format::constants::*;
use std::fmt;

/// Flat sector image type, identified by the tag stored in IMAGE modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    /// 1581 3.5" image
    D81,
    /// 8050 single-sided image
    D80,
    /// 8250 double-sided image
    D82,
    /// D9060/D9090 hard disk image
    D90,
}

impl ImageType {
    /// Decode an image type tag
    pub fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            1581 => Some(ImageType::D81),
            8050 => Some(ImageType::D80),
            8250 => Some(ImageType::D82),
            9000 => Some(ImageType::D90),
            _ => None,
        }
    }

    /// Tag stored in IMAGE modules
    pub fn tag(&self) -> u16 {
        match self {
            ImageType::D81 => 1581,
            ImageType::D80 => 8050,
            ImageType::D82 => 8250,
            ImageType::D90 => 9000,
        }
    }

    /// Geometry used when none is known from an attached image
    pub fn default_geometry(&self) -> Geometry {
        match self {
            ImageType::D81 => Geometry::d81(),
            ImageType::D80 => Geometry::d80(),
            ImageType::D82 => Geometry::d82(),
            ImageType::D90 => Geometry::d9060(),
        }
    }

    /// Sectors holding the block availability map
    pub fn bam_sectors(&self) -> &'static [(u8, u8)] {
        match self {
            ImageType::D81 => &[(40, 1), (40, 2)],
            ImageType::D80 => &[(38, 0), (38, 3)],
            ImageType::D82 => &[(38, 0), (38, 3), (38, 6), (38, 9)],
            ImageType::D90 => &[],
        }
    }

    /// Track holding the directory, excluded from the free block count
    pub fn directory_track(&self) -> u8 {
        match self {
            ImageType::D81 => 40,
            ImageType::D80 | ImageType::D82 => 39,
            ImageType::D90 => 0,
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageType::D81 => write!(f, "D81"),
            ImageType::D80 => write!(f, "D80"),
            ImageType::D82 => write!(f, "D82"),
            ImageType::D90 => write!(f, "D90"),
        }
    }
}

/// Sectors per track, as a constant or by speed zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectorLayout {
    /// Every track has the same sector count
    Uniform(u8),
    /// `(last track, sectors)` zones, repeated for every side
    Zoned(&'static [(u8, u8)]),
}

const ZONES_8050: &[(u8, u8)] = &[(39, 29), (53, 27), (64, 25), (77, 23)];

/// Track and sector layout of a flat image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    /// Number of tracks, numbered from 1
    pub tracks: u8,
    /// Tracks per side for zoned layouts
    pub tracks_per_side: u8,
    /// Sectors per track
    pub layout: SectorLayout,
}

impl Geometry {
    /// Uniform geometry
    pub fn uniform(tracks: u8, sectors: u8) -> Self {
        Self {
            tracks,
            tracks_per_side: tracks,
            layout: SectorLayout::Uniform(sectors),
        }
    }

    /// 1581 (80 tracks, 40 sectors)
    pub fn d81() -> Self {
        Self::uniform(80, 40)
    }

    /// 8050 (77 tracks in four zones)
    pub fn d80() -> Self {
        Self {
            tracks: 77,
            tracks_per_side: 77,
            layout: SectorLayout::Zoned(ZONES_8050),
        }
    }

    /// 8250 (two 8050 sides)
    pub fn d82() -> Self {
        Self {
            tracks: 154,
            tracks_per_side: 77,
            layout: SectorLayout::Zoned(ZONES_8050),
        }
    }

    /// D9060 (153 cylinders, four heads of 32 sectors)
    pub fn d9060() -> Self {
        Self::uniform(153, 128)
    }

    /// D9090 (153 cylinders, six heads of 32 sectors)
    pub fn d9090() -> Self {
        Self::uniform(153, 192)
    }

    /// Sectors on a track, or `None` past the last track
    pub fn sectors_in_track(&self, track: u8) -> Option<u8> {
        if track == 0 || track > self.tracks {
            return None;
        }
        match &self.layout {
            SectorLayout::Uniform(sectors) => Some(*sectors),
            SectorLayout::Zoned(zones) => {
                let local = (track - 1) % self.tracks_per_side + 1;
                zones
                    .iter()
                    .find(|(last, _)| local <= *last)
                    .map(|(_, sectors)| *sectors)
            }
        }
    }

    /// Total number of sectors
    pub fn total_sectors(&self) -> usize {
        (1..=self.tracks)
            .filter_map(|t| self.sectors_in_track(t))
            .map(|s| s as usize)
            .sum()
    }

    /// Image size in bytes
    pub fn size_bytes(&self) -> usize {
        self.total_sectors() * SECTOR_SIZE
    }
}
