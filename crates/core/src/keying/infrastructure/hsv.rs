/// Converts one RGB pixel to 8-bit HSV.
///
/// Hue is stored as degrees / 2 so it fits in `0..180`; saturation and value
/// use the full `0..=255` range. Grays (no chroma) get hue 0.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f32;

    let s = if max == 0 {
        0.0
    } else {
        delta * 255.0 / max as f32
    };

    let h = if delta == 0.0 {
        0.0
    } else {
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let degrees = if max as f32 == r {
            60.0 * (g - b) / delta
        } else if max as f32 == g {
            120.0 + 60.0 * (b - r) / delta
        } else {
            240.0 + 60.0 * (r - g) / delta
        };
        if degrees < 0.0 {
            degrees + 360.0
        } else {
            degrees
        }
    };

    let h = (h / 2.0).round() as u16 % 180;
    [h as u8, s.round() as u8, max]
}

/// Inclusive box in HSV space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        hsv.iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::black(0, 0, 0, [0, 0, 0])]
    #[case::white(255, 255, 255, [0, 0, 255])]
    #[case::gray(128, 128, 128, [0, 0, 128])]
    #[case::red(255, 0, 0, [0, 255, 255])]
    #[case::green(0, 255, 0, [60, 255, 255])]
    #[case::blue(0, 0, 255, [120, 255, 255])]
    #[case::yellow(255, 255, 0, [30, 255, 255])]
    #[case::cyan(0, 255, 255, [90, 255, 255])]
    #[case::magenta(255, 0, 255, [150, 255, 255])]
    #[case::dark_green(0, 128, 0, [60, 255, 128])]
    fn test_rgb_to_hsv(#[case] r: u8, #[case] g: u8, #[case] b: u8, #[case] expected: [u8; 3]) {
        assert_eq!(rgb_to_hsv(r, g, b), expected);
    }

    #[test]
    fn test_desaturated_green_has_low_saturation() {
        let [h, s, v] = rgb_to_hsv(100, 120, 100);
        assert_eq!(h, 60);
        assert_eq!(v, 120);
        assert_eq!(s, 43); // 20 * 255 / 120 = 42.5
    }

    #[test]
    fn test_hue_near_full_circle_wraps_to_zero() {
        // Hue just under 360 degrees rounds to 180, which wraps.
        let [h, _, _] = rgb_to_hsv(255, 0, 1);
        assert!(h < 180);
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = HsvRange::new([35, 40, 40], [85, 255, 255]);
        assert!(range.contains([35, 40, 40]));
        assert!(range.contains([85, 255, 255]));
        assert!(range.contains([60, 200, 200]));
        assert!(!range.contains([34, 200, 200]));
        assert!(!range.contains([86, 200, 200]));
        assert!(!range.contains([60, 39, 200]));
        assert!(!range.contains([60, 200, 39]));
    }
}
