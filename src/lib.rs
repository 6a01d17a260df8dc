// TodoStore - single-user task list persisted to a JSON slot

pub mod config;
pub mod filter;
pub mod slot;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use config::Config;
pub use filter::FilterMode;
pub use store::TaskStore;
pub use task::{Task, format_timestamp, now_ms};
