use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::shared::error::TaskError;
use crate::tasks::domain::task::{TaskId, TaskRequest, TaskResult};
use crate::tasks::domain::task_store::TaskStore;
use crate::video::domain::background_loader::BackgroundLoader;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::pipeline_executor::{FrameStages, PipelineConfig, PipelineExecutor, PipelineOutcome};
use super::pipeline_logger::PipelineLogger;
use super::progress::running_progress;

/// Lifecycle of one background-replacement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Initializing,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Initializing => "initializing",
            PipelineState::Running => "running",
            PipelineState::Completed => "completed",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs one task end to end and records its progress and result.
///
/// Opens the video, fits the background to the frame size, opens the output
/// and hands everything to a `PipelineExecutor`. Progress and the terminal
/// result go to the injected `TaskStore`. Single-use: `execute` consumes
/// the reader and writer.
pub struct ReplaceBackgroundUseCase {
    reader: Option<Box<dyn VideoReader>>,
    writer: Option<Box<dyn VideoWriter>>,
    background_loader: Box<dyn BackgroundLoader>,
    stages: FrameStages,
    executor: Box<dyn PipelineExecutor>,
    logger: Box<dyn PipelineLogger>,
    store: Arc<dyn TaskStore>,
    cancelled: Arc<AtomicBool>,
    state: PipelineState,
}

impl ReplaceBackgroundUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reader: Box<dyn VideoReader>,
        writer: Box<dyn VideoWriter>,
        background_loader: Box<dyn BackgroundLoader>,
        stages: FrameStages,
        executor: Box<dyn PipelineExecutor>,
        logger: Box<dyn PipelineLogger>,
        store: Arc<dyn TaskStore>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            reader: Some(reader),
            writer: Some(writer),
            background_loader,
            stages,
            executor,
            logger,
            store,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
            state: PipelineState::Initializing,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Runs the task to a terminal state, stores the result and returns it.
    pub fn execute(&mut self, request: &TaskRequest) -> TaskResult {
        let id = &request.task_id;
        log::info!("Task {id}: {}", self.state);

        let result = match self.run(request) {
            Ok(PipelineOutcome::Completed { frames }) => {
                log::info!(
                    "Task {id}: wrote {frames} frames to {}",
                    request.output_path.display()
                );
                self.transition(id, PipelineState::Completed);
                TaskResult::success(&request.output_path)
            }
            Ok(PipelineOutcome::Cancelled { frames }) => {
                log::warn!("Task {id}: cancelled after {frames} frames");
                self.transition(id, PipelineState::Failed);
                TaskResult::Cancelled
            }
            Err(err) => {
                if err.is_config_class() {
                    log::warn!("Task {id}: rejected before processing: {err}");
                } else {
                    log::error!("Task {id}: {err}");
                }
                self.transition(id, PipelineState::Failed);
                TaskResult::from_error(&err)
            }
        };

        self.logger.summary();
        self.store.set_result(id, result.clone());
        result
    }

    fn run(&mut self, request: &TaskRequest) -> Result<PipelineOutcome, TaskError> {
        let mut reader = self
            .reader
            .take()
            .ok_or_else(|| TaskError::config(&request.video_path, "pipeline already executed"))?;
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| TaskError::resource(&request.output_path, "pipeline already executed"))?;

        let metadata = reader
            .open(&request.video_path)
            .map_err(|e| TaskError::config(&request.video_path, e))?;
        self.logger.info(&format!(
            "Video properties: {}x{}, {:.2} FPS, {} frames",
            metadata.width, metadata.height, metadata.fps, metadata.total_frames
        ));
        if !metadata.has_known_frame_count() {
            log::warn!(
                "Task {}: frame count unknown, progress stays at 0 until completion",
                request.task_id
            );
        }

        let background = match self.background_loader.load(
            &request.background_path,
            metadata.width,
            metadata.height,
        ) {
            Ok(bg) => bg,
            Err(e) => {
                reader.close();
                return Err(TaskError::config(&request.background_path, e));
            }
        };

        if let Err(e) = writer.open(&request.output_path, &metadata) {
            reader.close();
            return Err(TaskError::resource(&request.output_path, e));
        }

        self.transition(&request.task_id, PipelineState::Running);

        let store = self.store.clone();
        let id = request.task_id.clone();
        let config = PipelineConfig {
            on_progress: Some(Box::new(move |done, total| {
                if let Some(pct) = running_progress(done, total) {
                    store.set_progress(&id, pct);
                }
                true
            })),
            cancelled: self.cancelled.clone(),
        };

        self.executor.execute(
            reader,
            writer,
            &self.stages,
            &background,
            &metadata,
            &request.output_path,
            config,
            self.logger.as_mut(),
        )
    }

    fn transition(&mut self, id: &TaskId, next: PipelineState) {
        log::debug!("Task {id}: {} -> {next}", self.state);
        self.state = next;
    }
}
