//! Filesystem and process plumbing: config file, paths, chat log, dashboard.

pub mod dashboard;
pub mod paths;
pub mod storage;

pub use dashboard::{ChatLog, Dashboard, DashboardProcess, DashboardSettings};
pub use paths::IpygptPaths;
pub use storage::{ConfigStorage, FileConfig};
