pub mod constants;
pub mod error;
pub mod frame;
pub mod mask;
pub mod settings;
pub mod video_metadata;
