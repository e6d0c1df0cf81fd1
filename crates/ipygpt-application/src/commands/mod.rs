//! Magic command objects.
//!
//! Each command borrows the session context it acts on, performs one
//! externally visible action and returns a [`ipygpt_core::DisplayResult`].

mod chat;
mod config;
mod directives;
mod models;

pub use chat::{ChatArgs, ChatCommand};
pub use config::ConfigCommand;
pub use models::{ChatModelsBrowserCommand, ModelsArgs};
