use std::path::Path;

use crate::shared::error::BoxError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Reads frames sequentially from a video source.
///
/// Implementations handle container and codec details; the pipeline only
/// sees `Frame` and `VideoMetadata`.
pub trait VideoReader: Send {
    /// Opens the source and returns its stream properties.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, BoxError>;

    /// Returns an iterator over frames in decode order.
    fn frames(&mut self) -> Box<dyn Iterator<Item = Result<Frame, BoxError>> + '_>;

    /// Releases any resources held by the reader.
    fn close(&mut self);
}
