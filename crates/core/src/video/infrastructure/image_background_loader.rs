use std::path::Path;

use image::imageops::{self, FilterType};

use crate::shared::error::BoxError;
use crate::shared::frame::Frame;
use crate::video::domain::background_loader::BackgroundLoader;

/// Decodes a still image with the `image` crate and stretches it to the
/// requested size. Aspect ratio is not preserved.
///
/// The format is sniffed from the file contents; the extension is only a
/// fallback when the signature is unknown.
pub struct ImageBackgroundLoader;

impl ImageBackgroundLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageBackgroundLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundLoader for ImageBackgroundLoader {
    fn load(&self, path: &Path, width: u32, height: u32) -> Result<Frame, BoxError> {
        if width == 0 || height == 0 {
            return Err(format!("cannot fit background to {width}x{height}").into());
        }

        let rgb = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?
            .to_rgb8();
        let (src_w, src_h) = rgb.dimensions();

        let fitted = if (src_w, src_h) == (width, height) {
            rgb
        } else {
            log::debug!(
                "Stretching background {}x{} -> {}x{}",
                src_w,
                src_h,
                width,
                height
            );
            imageops::resize(&rgb, width, height, FilterType::Triangle)
        };

        Ok(Frame::new(fitted.into_raw(), width, height, 3, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_test_image;
    use rstest::rstest;

    #[test]
    fn test_same_size_is_pixel_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), "bg.png", 40, 30, [50, 100, 200]);

        let frame = ImageBackgroundLoader::new().load(&path, 40, 30).unwrap();
        assert_eq!(frame.width(), 40);
        assert_eq!(frame.height(), 30);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.pixel(0, 0), &[50, 100, 200]);
        assert_eq!(frame.pixel(39, 29), &[50, 100, 200]);
    }

    #[test]
    fn test_stretches_to_target_ignoring_aspect() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), "wide.png", 192, 108, [10, 200, 30]);

        let frame = ImageBackgroundLoader::new().load(&path, 64, 48).unwrap();
        assert_eq!(frame.width(), 64);
        assert_eq!(frame.height(), 48);
        assert_eq!(frame.data().len(), 64 * 48 * 3);
        // Uniform input stays uniform after resampling
        assert_eq!(frame.pixel(32, 24), &[10, 200, 30]);
    }

    #[test]
    fn test_upscales_small_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), "tiny.png", 4, 4, [0, 0, 0]);

        let frame = ImageBackgroundLoader::new().load(&path, 32, 16).unwrap();
        assert_eq!((frame.width(), frame.height()), (32, 16));
    }

    #[rstest]
    #[case::jpeg_extension("bg.jpg")]
    #[case::tiff_extension("bg.tif")]
    #[case::no_extension("bg_noext")]
    fn test_png_under_other_name_decodes(#[case] name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let png = write_test_image(dir.path(), "source.png", 12, 9, [70, 140, 210]);
        let misnamed = dir.path().join(name);
        std::fs::copy(&png, &misnamed).unwrap();

        let frame = ImageBackgroundLoader::new().load(&misnamed, 12, 9).unwrap();
        assert_eq!(frame.pixel(6, 4), &[70, 140, 210]);
    }

    #[test]
    fn test_non_image_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(ImageBackgroundLoader::new().load(&path, 16, 16).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = ImageBackgroundLoader::new().load(Path::new("/nonexistent/bg.jpg"), 16, 16);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_target_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), "bg.png", 8, 8, [1, 2, 3]);
        assert!(ImageBackgroundLoader::new().load(&path, 0, 8).is_err());
    }
}
