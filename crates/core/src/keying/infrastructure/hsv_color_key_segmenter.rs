use crate::keying::domain::backdrop_segmenter::BackdropSegmenter;
use crate::shared::constants::{DEFAULT_HSV_LOWER, DEFAULT_HSV_UPPER};
use crate::shared::error::BoxError;
use crate::shared::frame::Frame;
use crate::shared::mask::{Mask, MASK_ON};
use crate::shared::settings::KeyingSettings;

use super::hsv::{rgb_to_hsv, HsvRange};

/// Marks pixels whose hue, saturation and value fall inside a fixed HSV box.
///
/// Thresholding in HSV rather than RGB keeps the key stable when lighting
/// varies across the backdrop.
pub struct HsvColorKeySegmenter {
    range: HsvRange,
}

impl HsvColorKeySegmenter {
    pub fn new(range: HsvRange) -> Self {
        Self { range }
    }

    pub fn from_settings(settings: &KeyingSettings) -> Self {
        Self::new(HsvRange::new(settings.hsv_lower, settings.hsv_upper))
    }
}

impl Default for HsvColorKeySegmenter {
    fn default() -> Self {
        Self::new(HsvRange::new(DEFAULT_HSV_LOWER, DEFAULT_HSV_UPPER))
    }
}

impl BackdropSegmenter for HsvColorKeySegmenter {
    fn segment(&self, frame: &Frame) -> Result<Mask, BoxError> {
        if frame.channels() != 3 {
            return Err(format!(
                "color keying needs 3-channel RGB frames, got {} channels",
                frame.channels()
            )
            .into());
        }

        let data = frame
            .data()
            .chunks_exact(3)
            .map(|px| {
                if self.range.contains(rgb_to_hsv(px[0], px[1], px[2])) {
                    MASK_ON
                } else {
                    0
                }
            })
            .collect();

        Ok(Mask::new(data, frame.width(), frame.height()))
    }
}
