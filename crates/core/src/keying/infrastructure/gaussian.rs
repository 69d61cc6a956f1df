/// Fixed binomial kernels used for small sizes when no sigma is given.
const SMALL_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// Builds a normalized 1D Gaussian kernel of the given odd size.
///
/// Sizes up to 7 use the fixed binomial tables; larger sizes derive sigma as
/// `0.3 * ((size - 1) * 0.5 - 1) + 0.8`, the usual convention when sigma is
/// left unspecified.
pub fn gaussian_kernel_1d(kernel_size: usize) -> Vec<f32> {
    debug_assert!(kernel_size >= 1 && kernel_size % 2 == 1);
    if kernel_size <= 7 {
        return SMALL_KERNELS[kernel_size / 2].to_vec();
    }
    let sigma = 0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (kernel_size / 2) as f64;
    let mut kernel_f64: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel_f64.iter().sum();
    for v in &mut kernel_f64 {
        *v /= sum;
    }
    kernel_f64.iter().map(|&v| v as f32).collect()
}

/// Mirrors an out-of-range coordinate back into `0..len` without repeating
/// the edge sample (`dcb|abcd|cba`).
fn reflect_101(pos: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut p = pos;
    while p < 0 || p > last {
        p = if p < 0 { -p } else { 2 * last - p };
    }
    p as usize
}

/// Applies a separable Gaussian blur to a single-channel buffer in place,
/// reusing `temp` for the intermediate horizontal pass.
pub fn blur_single_channel(
    data: &mut [u8],
    width: usize,
    height: usize,
    kernel: &[f32],
    temp: &mut Vec<f32>,
) {
    let kernel_size = kernel.len();
    if kernel_size <= 1 || width == 0 || height == 0 {
        return;
    }
    let half = (kernel_size / 2) as isize;

    temp.resize(width * height, 0.0);

    // Horizontal pass: data → temp
    for y in 0..height {
        let row = &data[y * width..(y + 1) * width];
        for x in 0..width {
            let mut sum = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - half, width);
                sum += row[sx] as f32 * w;
            }
            temp[y * width + x] = sum;
        }
    }

    // Vertical pass: temp → data
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - half, height);
                sum += temp[sy * width + x] * w;
            }
            data[y * width + x] = sum.round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    #[case(7)]
    #[case(9)]
    #[case(15)]
    fn test_kernel_sums_to_one(#[case] size: usize) {
        let k = gaussian_kernel_1d(size);
        assert_eq!(k.len(), size);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_kernel_is_symmetric_with_peak_at_center() {
        let k = gaussian_kernel_1d(9);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-6);
            assert!(k[i] <= k[4]);
        }
    }

    #[test]
    fn test_five_tap_kernel_is_binomial() {
        assert_eq!(
            gaussian_kernel_1d(5),
            vec![0.0625, 0.25, 0.375, 0.25, 0.0625]
        );
    }

    #[rstest]
    #[case::inside(2, 5, 2)]
    #[case::one_before(-1, 5, 1)]
    #[case::two_before(-2, 5, 2)]
    #[case::one_after(5, 5, 3)]
    #[case::two_after(6, 5, 2)]
    #[case::single(-3, 1, 0)]
    fn test_reflect_101(#[case] pos: isize, #[case] len: usize, #[case] expected: usize) {
        assert_eq!(reflect_101(pos, len), expected);
    }

    #[test]
    fn test_blur_uniform_buffer_unchanged() {
        let mut data = vec![255u8; 10 * 10];
        let mut temp = Vec::new();
        blur_single_channel(&mut data, 10, 10, &gaussian_kernel_1d(5), &mut temp);
        assert!(data.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_blur_softens_hard_edge() {
        // Left half off, right half on.
        let mut data: Vec<u8> = (0..8 * 8)
            .map(|i| if i % 8 >= 4 { 255 } else { 0 })
            .collect();
        let mut temp = Vec::new();
        blur_single_channel(&mut data, 8, 8, &gaussian_kernel_1d(5), &mut temp);

        let row: Vec<u8> = data[..8].to_vec();
        assert_eq!(row[0], 0);
        assert_eq!(row[7], 255);
        // Pixels adjacent to the edge become intermediate gray levels.
        assert!(row[3] > 0 && row[3] < 255);
        assert!(row[4] > 0 && row[4] < 255);
        // Monotonic ramp across the edge.
        for w in row.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn test_kernel_size_1_is_identity() {
        let mut data: Vec<u8> = (0..25).collect();
        let original = data.clone();
        let mut temp = Vec::new();
        blur_single_channel(&mut data, 5, 5, &gaussian_kernel_1d(1), &mut temp);
        assert_eq!(data, original);
    }
}
