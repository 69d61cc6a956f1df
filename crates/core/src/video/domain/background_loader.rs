use std::path::Path;

use crate::shared::error::BoxError;
use crate::shared::frame::Frame;

/// Decodes a still background image and stretches it to the video size.
///
/// The result always has exactly `width`×`height` pixels and 3 channels;
/// aspect ratio is not preserved.
pub trait BackgroundLoader: Send {
    fn load(&self, path: &Path, width: u32, height: u32) -> Result<Frame, BoxError>;
}
