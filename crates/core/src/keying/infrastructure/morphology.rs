//! Binary opening and closing with a square structuring element.
//!
//! Backed by `imageproc`'s distance-transform morphology under the `L∞`
//! norm, where radius `k` is a `(2k+1)×(2k+1)` square. Pixels outside the
//! raster never count as background, so a fully set mask survives erosion.

use imageproc::distance_transform::Norm;
use imageproc::morphology;

use crate::shared::mask::Mask;

fn radius(kernel_size: usize) -> u8 {
    u8::try_from(kernel_size / 2).unwrap_or(u8::MAX)
}

/// Erosion followed by dilation: removes specks smaller than the kernel.
pub fn open(mask: &Mask, kernel_size: usize) -> Mask {
    morphology::open(&mask.to_gray_image(), Norm::LInf, radius(kernel_size)).into()
}

/// Dilation followed by erosion: fills holes smaller than the kernel.
pub fn close(mask: &Mask, kernel_size: usize) -> Mask {
    morphology::close(&mask.to_gray_image(), Norm::LInf, radius(kernel_size)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::mask::MASK_ON;

    fn mask_from_rows(rows: &[&str]) -> Mask {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let data = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| if c == '#' { MASK_ON } else { 0 }))
            .collect();
        Mask::new(data, width, height)
    }

    fn rows_of(mask: &Mask) -> Vec<String> {
        (0..mask.height())
            .map(|y| {
                (0..mask.width())
                    .map(|x| if mask.get(x, y) == MASK_ON { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_full_mask_survives_at_borders() {
        let mask = Mask::new(vec![MASK_ON; 16], 4, 4);
        assert_eq!(open(&mask, 3), mask);
        assert_eq!(close(&mask, 3), mask);
    }

    #[test]
    fn test_empty_mask_stays_empty() {
        let mask = Mask::empty(6, 4);
        assert_eq!(open(&mask, 3), mask);
        assert_eq!(close(&mask, 3), mask);
    }

    #[test]
    fn test_open_removes_isolated_speck() {
        let mask = mask_from_rows(&[
            "#......", //
            ".......", //
            "...####", //
            "...####", //
            "...####",
        ]);
        let opened = open(&mask, 3);
        assert_eq!(
            rows_of(&opened),
            vec![".......", ".......", "...####", "...####", "...####"]
        );
    }

    #[test]
    fn test_open_removes_one_pixel_line() {
        let mask = mask_from_rows(&[".....", ".....", "#####", ".....", "....."]);
        assert_eq!(open(&mask, 3).count_on(), 0);
    }

    #[test]
    fn test_close_fills_pinhole() {
        let mask = mask_from_rows(&["#####", "#####", "##.##", "#####", "#####"]);
        let closed = close(&mask, 3);
        assert_eq!(closed.count_on(), 25);
    }

    #[test]
    fn test_close_keeps_gap_wider_than_kernel() {
        let mask = mask_from_rows(&["##...##", "##...##", "##...##"]);
        assert_eq!(rows_of(&close(&mask, 3)), rows_of(&mask));
    }

    #[test]
    fn test_kernel_size_1_is_identity() {
        let mask = mask_from_rows(&["#.#", ".#.", "#.#"]);
        assert_eq!(open(&mask, 1), mask);
        assert_eq!(close(&mask, 1), mask);
    }
}
