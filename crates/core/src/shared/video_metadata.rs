use std::path::PathBuf;

/// Stream properties read from the source video when it is opened.
///
/// `total_frames` is whatever the container reports and may be `0` when the
/// count is unknown.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    pub fn has_known_frame_count(&self) -> bool {
        self.total_frames > 0
    }

    /// Integer frame rate used for the output timebase; 30 when unknown.
    pub fn output_fps(&self) -> i32 {
        match self.fps.round() as i32 {
            fps if fps > 0 => fps,
            _ => 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn meta(fps: f64, total_frames: usize) -> VideoMetadata {
        VideoMetadata {
            width: 640,
            height: 480,
            fps,
            total_frames,
            codec: "mpeg4".to_string(),
            source_path: Some(PathBuf::from("/tmp/in.mp4")),
        }
    }

    #[test]
    fn test_construction() {
        let m = meta(30.0, 10);
        assert_eq!(m.width, 640);
        assert_eq!(m.height, 480);
        assert_eq!(m.total_frames, 10);
        assert_eq!(m.codec, "mpeg4");
        assert_eq!(m.source_path, Some(PathBuf::from("/tmp/in.mp4")));
    }

    #[test]
    fn test_unknown_frame_count() {
        assert!(!meta(30.0, 0).has_known_frame_count());
        assert!(meta(30.0, 1).has_known_frame_count());
    }

    #[rstest]
    #[case::integral(30.0, 30)]
    #[case::ntsc(29.97, 30)]
    #[case::film(23.976, 24)]
    #[case::unknown(0.0, 30)]
    #[case::negative(-5.0, 30)]
    fn test_output_fps(#[case] fps: f64, #[case] expected: i32) {
        assert_eq!(meta(fps, 10).output_fps(), expected);
    }
}
