use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::compositing::infrastructure::alpha_compositor::AlphaCompositor;
use crate::keying::infrastructure::hsv_color_key_segmenter::HsvColorKeySegmenter;
use crate::keying::infrastructure::morphological_mask_refiner::MorphologicalMaskRefiner;
use crate::pipeline::infrastructure::threaded_pipeline_executor::ThreadedPipelineExecutor;
use crate::pipeline::pipeline_executor::FrameStages;
use crate::pipeline::pipeline_logger::StdoutPipelineLogger;
use crate::pipeline::replace_background_use_case::ReplaceBackgroundUseCase;
use crate::shared::constants::PROGRESS_LOG_INTERVAL;
use crate::shared::settings::KeyingSettings;
use crate::tasks::domain::task::TaskId;
use crate::tasks::domain::task_store::TaskStore;
use crate::tasks::task_executor::PipelineFactory;
use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;
use crate::video::infrastructure::ffmpeg_writer::FfmpegWriter;
use crate::video::infrastructure::image_background_loader::ImageBackgroundLoader;

/// Wires the production pipeline: ffmpeg decode/encode, HSV keying,
/// morphological refinement and linear compositing.
pub struct FfmpegPipelineFactory {
    keying: KeyingSettings,
}

impl FfmpegPipelineFactory {
    pub fn new(keying: KeyingSettings) -> Self {
        Self { keying }
    }
}

impl Default for FfmpegPipelineFactory {
    fn default() -> Self {
        Self::new(KeyingSettings::default())
    }
}

impl PipelineFactory for FfmpegPipelineFactory {
    fn build(
        &self,
        task_id: &TaskId,
        store: Arc<dyn TaskStore>,
        cancelled: Arc<AtomicBool>,
    ) -> ReplaceBackgroundUseCase {
        ReplaceBackgroundUseCase::new(
            Box::new(FfmpegReader::new()),
            Box::new(FfmpegWriter::new()),
            Box::new(ImageBackgroundLoader::new()),
            FrameStages {
                segmenter: Box::new(HsvColorKeySegmenter::from_settings(&self.keying)),
                refiner: Box::new(MorphologicalMaskRefiner::from_settings(&self.keying)),
                compositor: Box::new(AlphaCompositor::new()),
            },
            Box::new(ThreadedPipelineExecutor::new()),
            Box::new(
                StdoutPipelineLogger::new(PROGRESS_LOG_INTERVAL).with_label(task_id.as_str()),
            ),
            store,
            Some(cancelled),
        )
    }
}
