use crate::keying::domain::mask_refiner::MaskRefiner;
use crate::shared::constants::{DEFAULT_BLUR_KERNEL, DEFAULT_MORPH_KERNEL};
use crate::shared::mask::{AlphaMatte, Mask};
use crate::shared::settings::KeyingSettings;

use super::gaussian::{blur_single_channel, gaussian_kernel_1d};
use super::morphology;

/// Cleans a raw key mask and feathers its edges.
///
/// Pipeline: opening (drop specks) → closing (fill pinholes) → Gaussian blur
/// → rescale to `[0, 1]`. Opening runs first so noise is removed before
/// closing could merge it into larger blobs.
pub struct MorphologicalMaskRefiner {
    morph_kernel: usize,
    blur_kernel: Vec<f32>,
}

impl MorphologicalMaskRefiner {
    /// `morph_kernel` and `blur_kernel` must be odd and >= 1.
    pub fn new(morph_kernel: usize, blur_kernel: usize) -> Self {
        Self {
            morph_kernel,
            blur_kernel: gaussian_kernel_1d(blur_kernel),
        }
    }

    pub fn from_settings(settings: &KeyingSettings) -> Self {
        Self::new(settings.morph_kernel, settings.blur_kernel)
    }
}

impl Default for MorphologicalMaskRefiner {
    fn default() -> Self {
        Self::new(DEFAULT_MORPH_KERNEL, DEFAULT_BLUR_KERNEL)
    }
}

impl MaskRefiner for MorphologicalMaskRefiner {
    fn refine(&self, mask: &Mask) -> AlphaMatte {
        let opened = morphology::open(mask, self.morph_kernel);
        let mut cleaned = morphology::close(&opened, self.morph_kernel);

        let mut temp = Vec::new();
        blur_single_channel(
            cleaned.data_mut(),
            mask.width() as usize,
            mask.height() as usize,
            &self.blur_kernel,
            &mut temp,
        );

        AlphaMatte::from_mask(&cleaned)
    }
}
