//! amt-prompts — `Prompter` implementations.
//!
//! [`TerminalPrompter`] drives real sessions through `dialoguer`;
//! [`ScriptedPrompter`] replays a fixed script so the session engine can be
//! exercised without a terminal.

pub mod scripted;
pub mod terminal;

pub use scripted::{Interaction, Scripted, ScriptedPrompter};
pub use terminal::TerminalPrompter;
