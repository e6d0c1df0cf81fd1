//! Storage layer for the persisted config file.

mod config_storage;

pub use config_storage::{ConfigStorage, FileConfig};
