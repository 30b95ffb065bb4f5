//! Messages describing dialogue transitions for UI and transcript consumers.
use bevy::prelude::Message;

use crate::npc::components::PhilosopherId;

/// Why a conversation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The player acknowledged the last line.
    Finished,
    /// The player left interaction range mid-conversation.
    WalkedAway,
}

impl CloseReason {
    pub fn label(self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::WalkedAway => "walked_away",
        }
    }
}

/// A single step of the conversation lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueTransition {
    Started {
        speaker: PhilosopherId,
        name: String,
        line_count: usize,
    },
    LineStarted {
        speaker: PhilosopherId,
        index: usize,
        line: String,
    },
    /// The current line is fully visible; `skipped` when the player cut the typewriter short.
    LineRevealed {
        speaker: PhilosopherId,
        index: usize,
        skipped: bool,
    },
    Closed {
        speaker: PhilosopherId,
        reason: CloseReason,
    },
}

impl DialogueTransition {
    pub fn speaker(&self) -> &PhilosopherId {
        match self {
            Self::Started { speaker, .. }
            | Self::LineStarted { speaker, .. }
            | Self::LineRevealed { speaker, .. }
            | Self::Closed { speaker, .. } => speaker,
        }
    }
}

/// Fired by the exploration scene for every dialogue transition of a frame.
#[derive(Message, Debug, Clone)]
pub struct DialogueTransitionEvent {
    pub transition: DialogueTransition,
}
