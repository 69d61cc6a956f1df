pub mod ffmpeg_pipeline_factory;
pub mod in_memory_task_store;
