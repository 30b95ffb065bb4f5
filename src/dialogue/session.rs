//! Conversation state machine with a typewriter reveal.
//!
//! `Closed -> Typing -> AwaitingAdvance -> (Typing | Closed)`. Typing reveals one
//! character per reveal interval and flips to `AwaitingAdvance` on its own once the
//! whole line is visible. Calls made in a phase where they mean nothing are ignored.
use crate::npc::components::PhilosopherId;

/// Default seconds between two revealed characters.
pub const DEFAULT_REVEAL_INTERVAL_SECS: f32 = 0.04;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialoguePhase {
    #[default]
    Closed,
    Typing,
    AwaitingAdvance,
}

/// Result of routing the interact press into an open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Session was closed; nothing happened.
    Ignored,
    /// The typewriter was skipped and the whole line is shown.
    Revealed,
    /// Moved on to the line at this index.
    NextLine(usize),
    /// The last line was acknowledged and the session closed.
    Finished,
}

#[derive(Debug, Clone)]
pub struct DialogueSession {
    speaker: Option<PhilosopherId>,
    lines: Vec<String>,
    line_index: usize,
    cursor: usize,
    phase: DialoguePhase,
    reveal_timer: f32,
    reveal_interval: f32,
}

impl Default for DialogueSession {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_INTERVAL_SECS)
    }
}

impl DialogueSession {
    pub fn new(reveal_interval: f32) -> Self {
        Self {
            speaker: None,
            lines: Vec::new(),
            line_index: 0,
            cursor: 0,
            phase: DialoguePhase::Closed,
            reveal_timer: 0.0,
            reveal_interval: reveal_interval.max(0.0),
        }
    }

    pub fn phase(&self) -> DialoguePhase {
        self.phase
    }

    pub fn is_typing(&self) -> bool {
        self.phase == DialoguePhase::Typing
    }

    pub fn is_active(&self) -> bool {
        self.phase != DialoguePhase::Closed
    }

    /// Whether the dialogue surface should be shown.
    pub fn is_visible(&self) -> bool {
        self.is_active()
    }

    /// Philosopher the session is talking to, by identity only.
    pub fn speaker(&self) -> Option<&PhilosopherId> {
        self.speaker.as_ref()
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Characters of the current line revealed so far.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_line(&self) -> Option<&str> {
        if !self.is_active() {
            return None;
        }
        self.lines.get(self.line_index).map(String::as_str)
    }

    /// Prefix of the current line up to the cursor; empty while closed.
    pub fn revealed_text(&self) -> &str {
        let Some(line) = self.current_line() else {
            return "";
        };
        match line.char_indices().nth(self.cursor) {
            Some((byte, _)) => &line[..byte],
            None => line,
        }
    }

    /// Opens a conversation. Returns `false` if one is already open or there is nothing to say.
    pub fn start(&mut self, speaker: PhilosopherId, lines: &[String]) -> bool {
        if self.is_active() || lines.is_empty() {
            return false;
        }

        self.speaker = Some(speaker);
        self.lines = lines.to_vec();
        self.begin_line(0);
        true
    }

    /// Advances the typewriter. Returns `true` on the tick the current line completes.
    pub fn tick(&mut self, delta: f32) -> bool {
        if self.phase != DialoguePhase::Typing {
            return false;
        }

        let length = self.current_line_length();
        if self.reveal_interval <= 0.0 {
            self.cursor = length;
        } else {
            self.reveal_timer += delta.max(0.0);
            while self.cursor < length && self.reveal_timer >= self.reveal_interval {
                self.reveal_timer -= self.reveal_interval;
                self.cursor += 1;
            }
        }

        if self.cursor >= length {
            self.finish_line();
            return true;
        }
        false
    }

    /// Skips the typewriter while typing; otherwise moves to the next line or closes.
    pub fn advance_or_skip(&mut self) -> AdvanceOutcome {
        match self.phase {
            DialoguePhase::Closed => AdvanceOutcome::Ignored,
            DialoguePhase::Typing => {
                self.cursor = self.current_line_length();
                self.finish_line();
                AdvanceOutcome::Revealed
            }
            DialoguePhase::AwaitingAdvance => {
                let next = self.line_index + 1;
                if next < self.lines.len() {
                    self.begin_line(next);
                    AdvanceOutcome::NextLine(next)
                } else {
                    self.close();
                    AdvanceOutcome::Finished
                }
            }
        }
    }

    /// Forces the session closed, discarding any partially revealed text.
    /// Returns `true` if a conversation was actually open.
    pub fn close(&mut self) -> bool {
        let was_active = self.is_active();
        self.phase = DialoguePhase::Closed;
        self.speaker = None;
        self.lines.clear();
        self.line_index = 0;
        self.cursor = 0;
        self.reveal_timer = 0.0;
        was_active
    }

    fn begin_line(&mut self, index: usize) {
        self.line_index = index;
        self.cursor = 0;
        self.reveal_timer = 0.0;
        self.phase = DialoguePhase::Typing;
        if self.current_line_length() == 0 {
            self.finish_line();
        }
    }

    fn finish_line(&mut self) {
        self.reveal_timer = 0.0;
        self.phase = DialoguePhase::AwaitingAdvance;
    }

    fn current_line_length(&self) -> usize {
        self.lines
            .get(self.line_index)
            .map_or(0, |line| line.chars().count())
    }
}
