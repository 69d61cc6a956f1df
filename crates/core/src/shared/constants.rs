/// Inclusive lower HSV bound of the green backdrop (8-bit HSV, hue in 0..180).
pub const DEFAULT_HSV_LOWER: [u8; 3] = [35, 40, 40];
/// Inclusive upper HSV bound of the green backdrop.
pub const DEFAULT_HSV_UPPER: [u8; 3] = [85, 255, 255];

/// Largest hue value in the 8-bit HSV encoding (degrees / 2).
pub const MAX_HUE: u8 = 179;

/// Side of the square structuring element used for opening and closing.
pub const DEFAULT_MORPH_KERNEL: usize = 3;
/// Gaussian kernel size used to soften mask edges.
pub const DEFAULT_BLUR_KERNEL: usize = 5;

pub const DEFAULT_WORKERS: usize = 2;
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Frames between progress log lines.
pub const PROGRESS_LOG_INTERVAL: usize = 30;

pub const SUCCESS_MESSAGE: &str = "Green screen replacement completed successfully!";

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv", "flv"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];
