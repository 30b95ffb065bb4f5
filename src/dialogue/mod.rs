//! Dialogue module: the conversation state machine, its messages, and the transcript.
pub mod events;
pub mod plugin;
pub mod session;
pub mod transcript;

pub use plugin::DialoguePlugin;
