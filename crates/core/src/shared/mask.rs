use image::GrayImage;
use ndarray::ArrayView2;

/// Intensity value marking a backdrop pixel in a binary [`Mask`].
pub const MASK_ON: u8 = 255;

/// Single-channel 8-bit raster with the same spatial size as a frame.
///
/// Segmentation produces a binary mask (`0` or [`MASK_ON`]); blurring during
/// refinement introduces intermediate gray levels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Mask {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "mask length must equal width * height"
        );
        Self {
            data,
            width,
            height,
        }
    }

    pub fn empty(width: u32, height: u32) -> Self {
        Self::new(vec![0; width as usize * height as usize], width, height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn count_on(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_raw(self.width, self.height, self.data.clone())
            .expect("Mask data length must match dimensions")
    }
}

impl From<GrayImage> for Mask {
    fn from(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height)
    }
}

/// Soft backdrop opacity in `[0, 1]` per pixel, broadcast across channels
/// when blending. `0` keeps the frame pixel, `1` takes the background pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaMatte {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl AlphaMatte {
    pub fn new(data: Vec<f32>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "matte length must equal width * height"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Rescales 8-bit mask intensities into the unit range.
    pub fn from_mask(mask: &Mask) -> Self {
        let data = mask
            .data()
            .iter()
            .map(|&v| v as f32 / MASK_ON as f32)
            .collect();
        Self::new(data, mask.width(), mask.height())
    }

    pub fn uniform(width: u32, height: u32, value: f32) -> Self {
        Self::new(
            vec![value; width as usize * height as usize],
            width,
            height,
        )
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn as_ndarray(&self) -> ArrayView2<'_, f32> {
        ArrayView2::from_shape((self.height as usize, self.width as usize), &self.data)
            .expect("Matte data length must match dimensions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_mask_is_all_zero() {
        let mask = Mask::empty(4, 3);
        assert_eq!(mask.data().len(), 12);
        assert_eq!(mask.count_on(), 0);
    }

    #[test]
    fn test_get_is_row_major() {
        let mut mask = Mask::empty(3, 2);
        mask.data_mut()[4] = MASK_ON; // row=1, col=1
        assert_eq!(mask.get(1, 1), MASK_ON);
        assert_eq!(mask.get(1, 0), 0);
        assert_eq!(mask.count_on(), 1);
    }

    #[test]
    fn test_gray_image_conversion_keeps_layout() {
        let mask = Mask::new(vec![0, MASK_ON, 7, 0, 0, MASK_ON], 3, 2);
        let image = mask.to_gray_image();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 0).0, [7]);
        assert_eq!(Mask::from(image), mask);
    }

    #[test]
    fn test_matte_from_mask_rescales() {
        let mask = Mask::new(vec![0, 51, 255, 128], 2, 2);
        let matte = AlphaMatte::from_mask(&mask);
        assert_relative_eq!(matte.get(0, 0), 0.0);
        assert_relative_eq!(matte.get(1, 0), 0.2);
        assert_relative_eq!(matte.get(0, 1), 1.0);
        assert_relative_eq!(matte.get(1, 1), 128.0 / 255.0);
    }

    #[test]
    fn test_matte_ndarray_shape() {
        let matte = AlphaMatte::uniform(5, 2, 0.5);
        assert_eq!(matte.as_ndarray().shape(), &[2, 5]);
    }

    #[test]
    #[should_panic(expected = "mask length must equal width * height")]
    fn test_mismatched_mask_length_panics_in_debug() {
        Mask::new(vec![0; 5], 2, 2);
    }
}
