use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::compositing::domain::compositor::Compositor;
use crate::keying::domain::backdrop_segmenter::BackdropSegmenter;
use crate::keying::domain::mask_refiner::MaskRefiner;
use crate::shared::error::TaskError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::pipeline_logger::PipelineLogger;

/// Configuration for a pipeline execution run.
pub struct PipelineConfig {
    /// Called after every written frame with `(frames_done, total_frames)`.
    /// Returning `false` stops the run as if it had been cancelled.
    pub on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    pub cancelled: Arc<AtomicBool>,
}

/// The per-frame transform chain: segment → refine → composite.
pub struct FrameStages {
    pub segmenter: Box<dyn BackdropSegmenter>,
    pub refiner: Box<dyn MaskRefiner>,
    pub compositor: Box<dyn Compositor>,
}

/// How a run that did not fail came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The reader was exhausted and every frame was written.
    Completed { frames: usize },
    /// The cancellation flag was raised (or the progress callback refused).
    Cancelled { frames: usize },
}

impl PipelineOutcome {
    pub fn frames(&self) -> usize {
        match self {
            PipelineOutcome::Completed { frames } | PipelineOutcome::Cancelled { frames } => {
                *frames
            }
        }
    }
}

/// Abstracts how the read → key → composite → write loop is executed.
///
/// `reader` and `writer` arrive already opened; the executor owns them from
/// here on and releases both before returning, whatever the outcome.
pub trait PipelineExecutor: Send {
    #[allow(clippy::too_many_arguments)]
    fn execute(
        &self,
        reader: Box<dyn VideoReader>,
        writer: Box<dyn VideoWriter>,
        stages: &FrameStages,
        background: &Frame,
        metadata: &VideoMetadata,
        output_path: &Path,
        config: PipelineConfig,
        logger: &mut dyn PipelineLogger,
    ) -> Result<PipelineOutcome, TaskError>;
}
