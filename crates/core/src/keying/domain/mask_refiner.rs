use crate::shared::mask::{AlphaMatte, Mask};

/// Turns a raw binary backdrop mask into a soft alpha matte in `[0, 1]`.
pub trait MaskRefiner: Send {
    fn refine(&self, mask: &Mask) -> AlphaMatte;
}
