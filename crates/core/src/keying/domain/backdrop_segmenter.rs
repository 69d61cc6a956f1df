use crate::shared::error::BoxError;
use crate::shared::frame::Frame;
use crate::shared::mask::Mask;

/// Domain interface for locating backdrop pixels in a frame.
///
/// Returns a binary mask of the frame's spatial size where backdrop pixels
/// are set to [`crate::shared::mask::MASK_ON`].
pub trait BackdropSegmenter: Send {
    fn segment(&self, frame: &Frame) -> Result<Mask, BoxError>;
}
