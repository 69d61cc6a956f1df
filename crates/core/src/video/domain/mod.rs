pub mod background_loader;
pub mod video_reader;
pub mod video_writer;
