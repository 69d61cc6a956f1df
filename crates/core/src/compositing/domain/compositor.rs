use crate::shared::error::BoxError;
use crate::shared::frame::Frame;
use crate::shared::mask::AlphaMatte;

/// Domain interface for replacing backdrop pixels with a background.
///
/// `background` must already match the frame's dimensions. The returned frame
/// keeps the input frame's size, channel count and index.
pub trait Compositor: Send {
    fn composite(
        &self,
        frame: &Frame,
        background: &Frame,
        matte: &AlphaMatte,
    ) -> Result<Frame, BoxError>;
}
