use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};

use crate::pipeline::pipeline_executor::{
    FrameStages, PipelineConfig, PipelineExecutor, PipelineOutcome,
};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::error::{BoxError, TaskError};
use crate::shared::frame::Frame;
use crate::shared::mask::MASK_ON;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

type WriterResult = Result<Box<dyn VideoWriter>, (usize, BoxError)>;

/// Executes the keying pipeline with dedicated threads for decode and encode.
///
/// Layout: `reader → main [segment/refine/composite] → writer`
///
/// Frames stay in decode order end to end; the bounded channels keep at most
/// a few frames in flight on either side of the main loop. The writer
/// acknowledges every frame it has encoded, and progress is counted from
/// those acknowledgements, so it never runs ahead of the output.
pub struct ThreadedPipelineExecutor {
    channel_capacity: usize,
}

impl ThreadedPipelineExecutor {
    pub fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_channel_capacity(channel_capacity: usize) -> Self {
        Self {
            channel_capacity: channel_capacity.max(1),
        }
    }
}

impl Default for ThreadedPipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineExecutor for ThreadedPipelineExecutor {
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
    ) -> Result<PipelineOutcome, TaskError> {
        let cap = self.channel_capacity;

        let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Result<Frame, BoxError>>(cap);
        let (write_tx, write_rx) = crossbeam_channel::bounded::<Frame>(cap);
        let (written_tx, written_rx) = crossbeam_channel::unbounded::<usize>();

        let reader_handle = spawn_reader(reader, frame_tx, config.cancelled.clone());
        let writer_handle = spawn_writer(writer, write_rx, written_tx);

        let main_result = run_main_loop(
            frame_rx,
            write_tx,
            written_rx,
            stages,
            background,
            metadata.total_frames,
            &config,
            logger,
        );

        join_threads(reader_handle, writer_handle, main_result, output_path)
    }
}

fn spawn_reader(
    mut reader: Box<dyn VideoReader>,
    frame_tx: Sender<Result<Frame, BoxError>>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<Box<dyn VideoReader>> {
    std::thread::spawn(move || {
        for frame_result in reader.frames() {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let failed = frame_result.is_err();
            if frame_tx.send(frame_result).is_err() || failed {
                break;
            }
        }
        reader.close();
        reader
    })
}

fn spawn_writer(
    mut writer: Box<dyn VideoWriter>,
    write_rx: Receiver<Frame>,
    written_tx: Sender<usize>,
) -> JoinHandle<WriterResult> {
    std::thread::spawn(move || {
        for frame in write_rx {
            writer.write(&frame).map_err(|e| (frame.index(), e))?;
            // Nobody listens once the main loop has stopped early
            let _ = written_tx.send(frame.index());
        }
        Ok(writer)
    })
}

/// Why the main loop stopped pulling frames.
enum LoopEnd {
    Exhausted(usize),
    Cancelled(usize),
    /// The writer hung up; its own error explains why.
    WriterGone,
}

/// How feeding frames to the writer ended.
enum Fed {
    Exhausted,
    Stopped,
    WriterGone,
}

/// Running count of frames the writer has acknowledged.
struct WrittenFrames<'a> {
    count: usize,
    total: usize,
    config: &'a PipelineConfig,
}

impl WrittenFrames<'_> {
    /// Records one written frame. Returns `false` when the progress callback
    /// asks to stop.
    fn record(&mut self, logger: &mut dyn PipelineLogger) -> bool {
        self.count += 1;
        logger.progress(self.count, self.total);
        self.config
            .on_progress
            .as_ref()
            .map_or(true, |callback| callback(self.count, self.total))
    }

    /// Records every acknowledgement already queued, without blocking.
    fn catch_up(&mut self, written_rx: &Receiver<usize>, logger: &mut dyn PipelineLogger) -> bool {
        for _ in written_rx.try_iter() {
            if !self.record(logger) {
                return false;
            }
        }
        true
    }
}

/// Drives the frame loop, then waits for the writer to acknowledge whatever
/// it still holds so the reported count matches the output on disk.
#[allow(clippy::too_many_arguments)]
fn run_main_loop(
    frame_rx: Receiver<Result<Frame, BoxError>>,
    write_tx: Sender<Frame>,
    written_rx: Receiver<usize>,
    stages: &FrameStages,
    background: &Frame,
    total_frames: usize,
    config: &PipelineConfig,
    logger: &mut dyn PipelineLogger,
) -> Result<LoopEnd, TaskError> {
    let mut written = WrittenFrames {
        count: 0,
        total: total_frames,
        config,
    };

    let fed = feed_frames(
        frame_rx,
        &write_tx,
        &written_rx,
        stages,
        background,
        config,
        &mut written,
        logger,
    );
    drop(write_tx);

    let mut stopped = matches!(fed, Ok(Fed::Stopped));
    if !stopped {
        // Ends once the writer has flushed its queue or failed
        for _ in written_rx.iter() {
            if !written.record(logger) {
                stopped = true;
                break;
            }
        }
    }

    match fed? {
        _ if stopped || config.cancelled.load(Ordering::Relaxed) => {
            Ok(LoopEnd::Cancelled(written.count))
        }
        Fed::WriterGone => Ok(LoopEnd::WriterGone),
        Fed::Exhausted | Fed::Stopped => Ok(LoopEnd::Exhausted(written.count)),
    }
}

/// Receives decoded frames, keys and composites each one, and forwards the
/// result to the writer thread. Returns on the first failing frame.
#[allow(clippy::too_many_arguments)]
fn feed_frames(
    frame_rx: Receiver<Result<Frame, BoxError>>,
    write_tx: &Sender<Frame>,
    written_rx: &Receiver<usize>,
    stages: &FrameStages,
    background: &Frame,
    config: &PipelineConfig,
    written: &mut WrittenFrames<'_>,
    logger: &mut dyn PipelineLogger,
) -> Result<Fed, TaskError> {
    for (received, frame_result) in frame_rx.into_iter().enumerate() {
        if config.cancelled.load(Ordering::Relaxed) {
            return Ok(Fed::Stopped);
        }

        let frame = frame_result.map_err(|e| TaskError::processing(received, e))?;
        let index = frame.index();

        let composited = process_frame(&frame, stages, background, logger)
            .map_err(|e| TaskError::processing(index, e))?;

        if write_tx.send(composited).is_err() {
            return Ok(Fed::WriterGone);
        }
        if !written.catch_up(written_rx, logger) {
            return Ok(Fed::Stopped);
        }
    }
    Ok(Fed::Exhausted)
}

fn process_frame(
    frame: &Frame,
    stages: &FrameStages,
    background: &Frame,
    logger: &mut dyn PipelineLogger,
) -> Result<Frame, BoxError> {
    let t0 = Instant::now();
    let mask = stages.segmenter.segment(frame)?;
    logger.timing("segment", t0.elapsed().as_secs_f64() * 1000.0);

    let pixels = frame.pixel_count();
    if pixels > 0 {
        let on = mask.data().iter().filter(|&&v| v == MASK_ON).count();
        logger.metric("backdrop_pct", on as f64 / pixels as f64 * 100.0);
    }

    let t1 = Instant::now();
    let matte = stages.refiner.refine(&mask);
    logger.timing("refine", t1.elapsed().as_secs_f64() * 1000.0);

    let t2 = Instant::now();
    let out = stages.compositor.composite(frame, background, &matte)?;
    logger.timing("composite", t2.elapsed().as_secs_f64() * 1000.0);

    Ok(out)
}

/// Joins both I/O threads and picks the error that explains the run best.
///
/// A writer failure outranks a main-loop error, since the main loop only
/// notices a dead writer indirectly.
fn join_threads(
    reader_handle: JoinHandle<Box<dyn VideoReader>>,
    writer_handle: JoinHandle<WriterResult>,
    main_result: Result<LoopEnd, TaskError>,
    output_path: &Path,
) -> Result<PipelineOutcome, TaskError> {
    let reader_panicked = match reader_handle.join() {
        Ok(mut r) => {
            r.close();
            false
        }
        Err(_) => true,
    };

    let writer_error = match writer_handle.join() {
        Ok(Ok(mut w)) => w
            .close()
            .err()
            .map(|e| TaskError::resource(output_path, e)),
        Ok(Err((index, e))) => Some(TaskError::processing(index, e)),
        Err(_) => Some(TaskError::resource(output_path, "writer thread panicked")),
    };

    let end = match (main_result, writer_error) {
        (_, Some(err @ TaskError::Processing { .. })) => return Err(err),
        (Err(e), _) => return Err(e),
        (Ok(_), Some(err)) => return Err(err),
        (Ok(end), None) => end,
    };

    match end {
        LoopEnd::Exhausted(frames) if reader_panicked => Err(TaskError::processing(
            frames,
            "reader thread panicked",
        )),
        LoopEnd::Exhausted(frames) => Ok(PipelineOutcome::Completed { frames }),
        LoopEnd::Cancelled(frames) => Ok(PipelineOutcome::Cancelled { frames }),
        LoopEnd::WriterGone => Err(TaskError::resource(
            output_path,
            "writer stopped accepting frames",
        )),
    }
}
