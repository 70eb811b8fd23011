/// Builder for flat sector images

use crate::error::Result;
use crate::format::{Geometry, ImageType};
use crate::image::SectorImage;

/// Builder for constructing flat sector images
pub struct SectorImageBuilder {
    image_type: ImageType,
    geometry: Geometry,
    filler: u8,
}

impl SectorImageBuilder {
    /// Start from the default geometry of an image type
    pub fn new(image_type: ImageType) -> Self {
        Self {
            image_type,
            geometry: image_type.default_geometry(),
            filler: 0,
        }
    }

    /// Override the geometry
    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Uniform geometry of `tracks` tracks with `sectors` sectors each
    pub fn uniform(mut self, tracks: u8, sectors: u8) -> Self {
        self.geometry = Geometry::uniform(tracks, sectors);
        self
    }

    /// Byte every sector is filled with
    pub fn filler(mut self, filler: u8) -> Self {
        self.filler = filler;
        self
    }

    /// Build the image
    pub fn build(self) -> Result<SectorImage> {
        let mut image = SectorImage::try_blank(self.image_type, self.geometry)?;
        if self.filler != 0 {
            image.fill(self.filler);
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::constants::*;

    #[test]
    fn test_builder_default() {
        let image = SectorImageBuilder::new(ImageType::D81).build().unwrap();
        assert_eq!(image.image_type(), ImageType::D81);
        assert_eq!(image.size_bytes(), D81_FILE_SIZE);
    }

    #[test]
    fn test_builder_custom() {
        let image = SectorImage::builder(ImageType::D90)
            .uniform(10, 32)
            .filler(0xE5)
            .build()
            .unwrap();

        assert_eq!(image.geometry().tracks, 10);
        assert_eq!(image.size_bytes(), 10 * 32 * SECTOR_SIZE);
        assert_eq!(image.read_sector(10, 31).unwrap()[0], 0xE5);
    }

    #[test]
    fn test_builder_with_geometry() {
        let image = SectorImage::builder(ImageType::D90)
            .geometry(Geometry::d9090())
            .build()
            .unwrap();
        assert_eq!(image.sectors_in_track(1), Some(192));
    }
}
