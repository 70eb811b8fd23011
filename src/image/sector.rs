/// Flat sector images

use crate::error::{Result, SnapshotError};
use crate::format::constants::SECTOR_SIZE;
use crate::format::{Geometry, ImageType};
use crate::image::SectorImageBuilder;

/// A flat image of 256-byte sectors addressed by (track, sector)
///
/// Tracks are numbered from 1 and sectors from 0, as on the drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorImage {
    image_type: ImageType,
    geometry: Geometry,
    track_starts: Vec<usize>,
    data: Vec<u8>,
    bam: Vec<u8>,
}

impl SectorImage {
    /// Allocate a zero-filled image
    pub fn try_blank(image_type: ImageType, geometry: Geometry) -> Result<Self> {
        let size = geometry.size_bytes();
        let mut data = Vec::new();
        data.try_reserve_exact(size).map_err(|_| {
            SnapshotError::AllocationFailure(format!("{} bytes for {} image", size, image_type))
        })?;
        data.resize(size, 0);

        let mut track_starts = Vec::with_capacity(geometry.tracks as usize);
        let mut offset = 0;
        for track in 1..=geometry.tracks {
            track_starts.push(offset);
            offset += geometry.sectors_in_track(track).unwrap_or(0) as usize * SECTOR_SIZE;
        }

        Ok(Self {
            image_type,
            geometry,
            track_starts,
            data,
            bam: Vec::new(),
        })
    }

    /// Create a builder for an image type
    pub fn builder(image_type: ImageType) -> SectorImageBuilder {
        SectorImageBuilder::new(image_type)
    }

    /// Image type
    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    /// Track and sector layout
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Image size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Raw image contents
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Sectors on a track, or `None` past the last track
    pub fn sectors_in_track(&self, track: u8) -> Option<u8> {
        self.geometry.sectors_in_track(track)
    }

    fn sector_offset(&self, track: u8, sector: u8) -> Result<usize> {
        match self.sectors_in_track(track) {
            Some(count) if sector < count => {
                Ok(self.track_starts[track as usize - 1] + sector as usize * SECTOR_SIZE)
            }
            _ => Err(SnapshotError::InvalidSector { track, sector }),
        }
    }

    /// Read one sector
    pub fn read_sector(&self, track: u8, sector: u8) -> Result<&[u8]> {
        let offset = self.sector_offset(track, sector)?;
        Ok(&self.data[offset..offset + SECTOR_SIZE])
    }

    /// Write one sector
    pub fn write_sector(&mut self, track: u8, sector: u8, data: &[u8]) -> Result<()> {
        if data.len() != SECTOR_SIZE {
            return Err(SnapshotError::malformed(format!(
                "Sector data is {} bytes, expected {}",
                data.len(),
                SECTOR_SIZE
            )));
        }
        let offset = self.sector_offset(track, sector)?;
        self.data[offset..offset + SECTOR_SIZE].copy_from_slice(data);
        Ok(())
    }

    /// Fill every sector with a byte
    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }

    /// Reload the cached block availability map from the image
    pub fn rebuild_bam(&mut self) -> Result<()> {
        let mut bam = Vec::with_capacity(self.image_type.bam_sectors().len() * SECTOR_SIZE);
        for &(track, sector) in self.image_type.bam_sectors() {
            bam.extend_from_slice(self.read_sector(track, sector)?);
        }
        self.bam = bam;
        Ok(())
    }

    /// Cached block availability map
    pub fn bam(&self) -> &[u8] {
        &self.bam
    }

    /// Free blocks counted from the cached map, outside the directory track
    pub fn free_blocks(&self) -> Option<u32> {
        let (entry_offset, entry_size, tracks_per_block) = match self.image_type {
            ImageType::D81 => (0x10, 6, 40),
            ImageType::D80 | ImageType::D82 => (0x06, 5, 50),
            ImageType::D90 => return None,
        };
        if self.bam.is_empty() {
            return None;
        }

        let directory = self.image_type.directory_track() as usize;
        let mut free = 0u32;
        for (block, chunk) in self.bam.chunks(SECTOR_SIZE).enumerate() {
            for entry in 0..tracks_per_block {
                let track = block * tracks_per_block + entry + 1;
                if track > self.geometry.tracks as usize {
                    break;
                }
                if track == directory {
                    continue;
                }
                free += chunk.get(entry_offset + entry * entry_size).copied().unwrap_or(0) as u32;
            }
        }
        Some(free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::constants::*;

    #[test]
    fn test_blank_sizes() {
        let d81 = SectorImage::try_blank(ImageType::D81, Geometry::d81()).unwrap();
        assert_eq!(d81.size_bytes(), D81_FILE_SIZE);
        let d82 = SectorImage::try_blank(ImageType::D82, Geometry::d82()).unwrap();
        assert_eq!(d82.size_bytes(), D82_FILE_SIZE);
    }

    #[test]
    fn test_read_write_sector() {
        let mut image = SectorImage::try_blank(ImageType::D80, Geometry::d80()).unwrap();
        let data = [0x42u8; SECTOR_SIZE];
        image.write_sector(40, 26, &data).unwrap();
        assert_eq!(image.read_sector(40, 26).unwrap(), &data[..]);
        assert_eq!(image.read_sector(40, 25).unwrap(), &[0u8; SECTOR_SIZE][..]);
    }

    #[test]
    fn test_sector_past_geometry() {
        let image = SectorImage::try_blank(ImageType::D80, Geometry::d80()).unwrap();
        assert!(matches!(
            image.read_sector(40, 27),
            Err(SnapshotError::InvalidSector { track: 40, sector: 27 })
        ));
        assert!(image.read_sector(0, 0).is_err());
        assert!(image.read_sector(78, 0).is_err());
    }

    #[test]
    fn test_short_sector_rejected() {
        let mut image = SectorImage::try_blank(ImageType::D81, Geometry::d81()).unwrap();
        assert!(image.write_sector(1, 0, &[0u8; 10]).is_err());
    }

    #[test]
    fn test_d81_free_blocks() {
        let mut image = SectorImage::try_blank(ImageType::D81, Geometry::d81()).unwrap();
        let mut bam = [0u8; SECTOR_SIZE];
        for entry in 0..40 {
            bam[0x10 + entry * 6] = 40;
        }
        image.write_sector(40, 1, &bam).unwrap();
        image.write_sector(40, 2, &bam).unwrap();

        assert_eq!(image.free_blocks(), None);
        image.rebuild_bam().unwrap();
        assert_eq!(image.bam().len(), 2 * SECTOR_SIZE);
        assert_eq!(image.free_blocks(), Some(79 * 40));
    }
}
