pub mod domain;
pub mod infrastructure;
pub mod task_executor;
