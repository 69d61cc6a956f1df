use ndarray::{Axis, Zip};

use crate::compositing::domain::compositor::Compositor;
use crate::shared::error::BoxError;
use crate::shared::frame::Frame;
use crate::shared::mask::AlphaMatte;

/// Linear alpha blend: `frame * (1 - m) + background * m` per channel.
///
/// No gamma handling; edge softness comes entirely from the matte.
pub struct AlphaCompositor;

impl AlphaCompositor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AlphaCompositor {
    fn default() -> Self {
        Self::new()
    }
}

fn check_shapes(frame: &Frame, background: &Frame, matte: &AlphaMatte) -> Result<(), BoxError> {
    if (background.width(), background.height()) != (frame.width(), frame.height()) {
        return Err(format!(
            "background is {}x{} but frame is {}x{}",
            background.width(),
            background.height(),
            frame.width(),
            frame.height()
        )
        .into());
    }
    if background.channels() != frame.channels() {
        return Err(format!(
            "background has {} channels but frame has {}",
            background.channels(),
            frame.channels()
        )
        .into());
    }
    if (matte.width(), matte.height()) != (frame.width(), frame.height()) {
        return Err(format!(
            "matte is {}x{} but frame is {}x{}",
            matte.width(),
            matte.height(),
            frame.width(),
            frame.height()
        )
        .into());
    }
    Ok(())
}

impl Compositor for AlphaCompositor {
    fn composite(
        &self,
        frame: &Frame,
        background: &Frame,
        matte: &AlphaMatte,
    ) -> Result<Frame, BoxError> {
        check_shapes(frame, background, matte)?;

        let mut out = Frame::new(
            vec![0; frame.data().len()],
            frame.width(),
            frame.height(),
            frame.channels(),
            frame.index(),
        );

        let alpha = matte.as_ndarray().insert_axis(Axis(2));
        Zip::from(out.as_ndarray_mut())
            .and(frame.as_ndarray())
            .and(background.as_ndarray())
            .and_broadcast(&alpha)
            .for_each(|o, &fg, &bg, &m| {
                let blended = fg as f32 * (1.0 - m) + bg as f32 * m;
                *o = blended.round().clamp(0.0, 255.0) as u8;
            });

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn gradient_frame(width: u32, height: u32, index: usize) -> Frame {
        let data = (0..width * height * 3).map(|i| (i * 7 % 256) as u8).collect();
        Frame::new(data, width, height, 3, index)
    }

    #[test]
    fn test_zero_matte_keeps_frame() {
        let frame = gradient_frame(6, 4, 3);
        let background = Frame::filled(6, 4, &[10, 20, 30], 0);
        let out = AlphaCompositor::new()
            .composite(&frame, &background, &AlphaMatte::uniform(6, 4, 0.0))
            .unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn test_full_matte_takes_background() {
        let frame = gradient_frame(6, 4, 3);
        let background = gradient_frame(6, 4, 0);
        let background = Frame::new(
            background.data().iter().map(|v| 255 - v).collect(),
            6,
            4,
            3,
            0,
        );
        let out = AlphaCompositor::new()
            .composite(&frame, &background, &AlphaMatte::uniform(6, 4, 1.0))
            .unwrap();
        assert_eq!(out.data(), background.data());
        assert_eq!(out.index(), 3);
    }

    #[rstest]
    #[case::quarter(0.25, 100, 200, 125)]
    #[case::half(0.5, 0, 255, 128)]
    #[case::three_quarters(0.75, 200, 0, 50)]
    fn test_partial_matte_blends_linearly(
        #[case] alpha: f32,
        #[case] fg: u8,
        #[case] bg: u8,
        #[case] expected: u8,
    ) {
        let frame = Frame::filled(2, 2, &[fg, fg, fg], 0);
        let background = Frame::filled(2, 2, &[bg, bg, bg], 0);
        let out = AlphaCompositor::new()
            .composite(&frame, &background, &AlphaMatte::uniform(2, 2, alpha))
            .unwrap();
        assert!(out.data().iter().all(|&v| (v as i32 - expected as i32).abs() <= 1));
    }

    #[test]
    fn test_matte_is_per_pixel_and_broadcast_across_channels() {
        let frame = Frame::filled(2, 1, &[200, 100, 50], 0);
        let background = Frame::filled(2, 1, &[0, 0, 0], 0);
        let matte = AlphaMatte::new(vec![0.0, 1.0], 2, 1);
        let out = AlphaCompositor::new()
            .composite(&frame, &background, &matte)
            .unwrap();
        assert_eq!(out.pixel(0, 0), &[200, 100, 50]);
        assert_eq!(out.pixel(1, 0), &[0, 0, 0]);
    }

    #[test]
    fn test_preserves_dimensions_and_channels() {
        let frame = gradient_frame(5, 3, 9);
        let background = Frame::filled(5, 3, &[1, 2, 3], 0);
        let out = AlphaCompositor::new()
            .composite(&frame, &background, &AlphaMatte::uniform(5, 3, 0.3))
            .unwrap();
        assert_eq!(out.width(), 5);
        assert_eq!(out.height(), 3);
        assert_eq!(out.channels(), 3);
        assert_eq!(out.index(), 9);
    }

    #[test]
    fn test_background_size_mismatch_is_error() {
        let frame = gradient_frame(4, 4, 0);
        let background = Frame::filled(8, 4, &[0, 0, 0], 0);
        let result =
            AlphaCompositor::new().composite(&frame, &background, &AlphaMatte::uniform(4, 4, 0.5));
        assert!(result.is_err());
    }

    #[test]
    fn test_matte_size_mismatch_is_error() {
        let frame = gradient_frame(4, 4, 0);
        let background = Frame::filled(4, 4, &[0, 0, 0], 0);
        let result =
            AlphaCompositor::new().composite(&frame, &background, &AlphaMatte::uniform(4, 2, 0.5));
        assert!(result.is_err());
    }

    #[test]
    fn test_channel_mismatch_is_error() {
        let frame = gradient_frame(2, 2, 0);
        let background = Frame::filled(2, 2, &[0, 0, 0, 255], 0);
        let result =
            AlphaCompositor::new().composite(&frame, &background, &AlphaMatte::uniform(2, 2, 0.5));
        assert!(result.is_err());
    }
}
