// tasklist - In-memory to-do list store with a terminal front end

pub mod config;
pub mod filter;
pub mod id;
pub mod shell;
pub mod store;
pub mod task;
pub mod theme;
pub mod view;

// Re-export main types for convenience
pub use config::Config;
pub use filter::Filter;
pub use id::{IdGenerator, SequentialIds, TimestampIds, now_ms};
pub use shell::{Command, Shell};
pub use store::{Counts, EditSession, TaskListStore};
pub use task::{Task, TaskId};
pub use theme::Theme;
