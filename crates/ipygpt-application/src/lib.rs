//! Application layer for ipygpt.
//!
//! Magic commands, the parser for magic invocations, and the host that owns
//! the chat/exec session contexts and dispatches invocations to commands.

pub mod commands;
pub mod magic;
pub mod magic_host;

#[cfg(test)]
mod testing;

pub use commands::{ChatCommand, ChatModelsBrowserCommand, ConfigCommand};
pub use magic::{MagicInvocation, MagicKind, MagicSpec, registered_magics, split_cells};
pub use magic_host::MagicHost;
