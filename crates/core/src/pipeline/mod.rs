pub mod infrastructure;
pub mod pipeline_executor;
pub mod pipeline_logger;
pub mod progress;
pub mod replace_background_use_case;
