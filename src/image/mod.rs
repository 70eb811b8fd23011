/// Disk content held by a drive

/// Builder for flat sector images
pub mod builder;
/// GCR half-track images
pub mod gcr;
/// P64 flux images
pub mod p64;
/// Flat sector images
pub mod sector;

pub use builder::SectorImageBuilder;
pub use gcr::GcrImage;
pub use p64::{P64Image, Pulse};
pub use sector::SectorImage;

use std::fmt;

/// The disk content a drive is working from
///
/// Exactly one representation is active. `Flux` means the drive's
/// [`P64Image`] holds the content.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DriveMedia {
    /// No disk
    #[default]
    None,
    /// Flat sector image
    Flat(SectorImage),
    /// Raw GCR half-tracks
    Gcr(GcrImage),
    /// Flux transitions in the drive's flux image
    Flux,
}

/// Which media representation is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// No disk
    None,
    /// Flat sector image
    Flat,
    /// Raw GCR half-tracks
    Gcr,
    /// Flux transitions
    Flux,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::None => write!(f, "none"),
            MediaKind::Flat => write!(f, "flat"),
            MediaKind::Gcr => write!(f, "GCR"),
            MediaKind::Flux => write!(f, "P64"),
        }
    }
}

impl DriveMedia {
    /// Kind of the active representation
    pub fn kind(&self) -> MediaKind {
        match self {
            DriveMedia::None => MediaKind::None,
            DriveMedia::Flat(_) => MediaKind::Flat,
            DriveMedia::Gcr(_) => MediaKind::Gcr,
            DriveMedia::Flux => MediaKind::Flux,
        }
    }

    /// GCR and flux content are both reported as GCR-loaded
    pub fn is_gcr_loaded(&self) -> bool {
        matches!(self, DriveMedia::Gcr(_) | DriveMedia::Flux)
    }

    /// Attached flat image
    pub fn flat_image(&self) -> Option<&SectorImage> {
        match self {
            DriveMedia::Flat(image) => Some(image),
            _ => None,
        }
    }

    /// Attached flat image, mutably
    pub fn flat_image_mut(&mut self) -> Option<&mut SectorImage> {
        match self {
            DriveMedia::Flat(image) => Some(image),
            _ => None,
        }
    }

    /// Loaded GCR image
    pub fn gcr_image(&self) -> Option<&GcrImage> {
        match self {
            DriveMedia::Gcr(image) => Some(image),
            _ => None,
        }
    }
}
