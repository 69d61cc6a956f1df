use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use greenscreen_core::shared::constants::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use greenscreen_core::shared::settings::Settings;
use greenscreen_core::tasks::domain::task::{TaskId, TaskRequest, TaskResult, TaskStatus};
use greenscreen_core::tasks::domain::task_store::TaskStore;
use greenscreen_core::tasks::infrastructure::ffmpeg_pipeline_factory::FfmpegPipelineFactory;
use greenscreen_core::tasks::infrastructure::in_memory_task_store::InMemoryTaskStore;
use greenscreen_core::tasks::task_executor::TaskExecutor;

/// Replace a green-screen backdrop in a video with a still image.
#[derive(Parser)]
#[command(name = "greenscreen")]
struct Cli {
    /// Input video (mp4, avi, mov, mkv, wmv, flv).
    video: PathBuf,

    /// Background image (jpg, jpeg, png, bmp, tiff).
    background: PathBuf,

    /// Output video file; `.mp4` is recommended.
    output: PathBuf,

    /// Task identifier. Defaults to the output file stem.
    #[arg(long)]
    task_id: Option<String>,

    /// JSON settings file with keying thresholds and executor sizing.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of worker threads (overrides the settings file).
    #[arg(long)]
    workers: Option<usize>,

    /// Progress polling interval in milliseconds.
    #[arg(long, default_value = "200")]
    poll_ms: u64,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut settings = match &cli.config {
        Some(path) => Settings::from_path(path)?,
        None => Settings::default(),
    };
    if let Some(workers) = cli.workers {
        settings.executor.workers = workers;
    }
    settings.validate()?;

    let task_id = cli
        .task_id
        .clone()
        .unwrap_or_else(|| default_task_id(&cli.output));
    let id = TaskId::new(task_id.clone());

    let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
    let factory = Arc::new(FfmpegPipelineFactory::new(settings.keying.clone()));
    let mut executor = TaskExecutor::new(&settings.executor, store.clone(), factory);

    executor.start(TaskRequest::new(
        &cli.video,
        &cli.background,
        &cli.output,
        task_id,
    ))?;

    let result = poll_until_finished(store.as_ref(), &id, Duration::from_millis(cli.poll_ms));
    executor.shutdown();

    match result {
        TaskResult::Success {
            output_path,
            message,
        } => {
            println!("{message}");
            log::info!("Output written to {}", output_path.display());
            Ok(())
        }
        TaskResult::Failure { kind, description } => {
            Err(format!("{description} ({kind} error)").into())
        }
        TaskResult::Cancelled => Err("Task was cancelled".into()),
    }
}

fn poll_until_finished(store: &dyn TaskStore, id: &TaskId, interval: Duration) -> TaskResult {
    let mut last_shown = -1.0;
    loop {
        match store.status(id) {
            TaskStatus::Finished(result) => {
                if result.is_success() {
                    eprint!("\rProcessing: {:.1}%", 100.0);
                }
                eprintln!();
                return result;
            }
            TaskStatus::Running { progress } if progress > last_shown => {
                eprint!("\rProcessing: {progress:.1}%");
                let _ = std::io::stderr().flush();
                last_shown = progress;
            }
            _ => {}
        }
        std::thread::sleep(interval);
    }
}

fn default_task_id(output: &Path) -> String {
    output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "greenscreen".to_string())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.video.exists() {
        return Err(format!("Video file not found: {}", cli.video.display()).into());
    }
    if !cli.background.exists() {
        return Err(format!("Background file not found: {}", cli.background.display()).into());
    }
    if !has_extension(&cli.video, VIDEO_EXTENSIONS) {
        return Err(format!(
            "Unsupported video format: {} (expected one of {})",
            cli.video.display(),
            VIDEO_EXTENSIONS.join(", ")
        )
        .into());
    }
    if !has_extension(&cli.background, IMAGE_EXTENSIONS) {
        return Err(format!(
            "Unsupported background format: {} (expected one of {})",
            cli.background.display(),
            IMAGE_EXTENSIONS.join(", ")
        )
        .into());
    }
    if cli.poll_ms == 0 {
        return Err("--poll-ms must be at least 1".into());
    }
    Ok(())
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| allowed.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
