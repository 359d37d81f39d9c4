use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

/// The base map, kept at its native resolution.
pub struct MapImage {
    path: PathBuf,
    image: DynamicImage,
}

impl MapImage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("Failed to open map image {}", path.display()))?;
        log::info!(
            "Loaded map {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self {
            path: path.to_path_buf(),
            image,
        })
    }

    #[cfg(test)]
    pub fn from_image(path: impl Into<PathBuf>, image: DynamicImage) -> Self {
        Self {
            path: path.into(),
            image,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Pixel size of the map at `zoom_factor`, truncated and never zero.
    pub fn scaled_size(&self, zoom_factor: f64) -> (u32, u32) {
        let (w, h) = self.size();
        (
            ((w as f64 * zoom_factor) as u32).max(1),
            ((h as f64 * zoom_factor) as u32).max(1),
        )
    }

    pub fn scaled(&self, zoom_factor: f64) -> RgbaImage {
        let (w, h) = self.scaled_size(zoom_factor);
        if (w, h) == self.size() {
            return self.image.to_rgba8();
        }
        self.image.resize_exact(w, h, FilterType::Triangle).to_rgba8()
    }
}

#[cfg(test)]
mod tests {
    use super::MapImage;
    use image::DynamicImage;

    fn map(w: u32, h: u32) -> MapImage {
        MapImage::from_image("test.png", DynamicImage::new_rgba8(w, h))
    }

    #[test]
    fn scaled_size_truncates() {
        let map = map(101, 51);
        assert_eq!(map.scaled_size(1.0), (101, 51));
        assert_eq!(map.scaled_size(0.5), (50, 25));
        assert_eq!(map.scaled_size(1.1), (111, 56));
    }

    #[test]
    fn scaled_image_matches_scaled_size() {
        let map = map(40, 20);
        let scaled = map.scaled(2.0);
        assert_eq!(scaled.dimensions(), (80, 40));
        assert_eq!(map.scaled(0.5).dimensions(), (20, 10));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MapImage::open(dir.path().join("nope.jpeg")).is_err());
    }

    #[test]
    fn opens_a_saved_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        image::RgbaImage::new(12, 8).save(&path).unwrap();

        let map = MapImage::open(&path).unwrap();
        assert_eq!(map.size(), (12, 8));
        assert_eq!(map.path(), path.as_path());
    }
}
