//! Rolling transcript of dialogue transitions, mirrored to a JSON-lines file.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::{log::warn, prelude::*};
use serde::Serialize;

use crate::core::SceneClock;

use super::events::{DialogueTransition, DialogueTransitionEvent};

const DEFAULT_TRANSCRIPT_LOG_PATH: &str = "logs/dialogue_history.jsonl";

const DEFAULT_TRANSCRIPT_CAPACITY: usize = 64;

/// Most recent transitions, oldest dropped first.
#[derive(Resource, Debug)]
pub struct DialogueTranscript {
    capacity: usize,
    records: VecDeque<TranscriptRecord>,
}

impl DialogueTranscript {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::new(),
        }
    }

    pub fn push(&mut self, record: TranscriptRecord) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn records(&self) -> impl Iterator<Item = &TranscriptRecord> {
        self.records.iter()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

impl Default for DialogueTranscript {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIPT_CAPACITY)
    }
}

#[derive(Debug, Clone)]
pub struct TranscriptRecord {
    pub frame: u64,
    pub occurred_at_seconds: f64,
    pub transition: DialogueTransition,
}

/// Pending transcript lines waiting to be appended to disk.
///
/// At most `capacity` lines are held while the file cannot be written; the oldest go first.
#[derive(Resource, Debug)]
pub struct DialogueTranscriptLog {
    output_path: PathBuf,
    capacity: usize,
    pending: VecDeque<TranscriptRecord>,
    failure_streak: u32,
}

impl DialogueTranscriptLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            capacity: DEFAULT_TRANSCRIPT_CAPACITY,
            pending: VecDeque::new(),
            failure_streak: 0,
        }
    }

    pub fn push(&mut self, record: &TranscriptRecord) {
        while self.pending.len() >= self.capacity {
            self.pending.pop_front();
        }
        self.pending.push_back(record.clone());
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Consecutive failed flushes; reset by the next successful one.
    pub fn failure_streak(&self) -> u32 {
        self.failure_streak
    }

    /// Appends pending lines. A line leaves the buffer only once it has been written.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let result = self.write_pending();
        match &result {
            Ok(()) => self.failure_streak = 0,
            Err(_) => self.failure_streak = self.failure_streak.saturating_add(1),
        }
        result
    }

    fn write_pending(&mut self) -> std::io::Result<()> {
        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;

        while let Some(record) = self.pending.front() {
            let mut line = serde_json::to_vec(&SerializableTranscriptRecord::from(record.clone()))?;
            line.push(b'\n');
            file.write_all(&line)?;
            self.pending.pop_front();
        }

        file.flush()
    }
}

impl Default for DialogueTranscriptLog {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIPT_LOG_PATH)
    }
}

/// Records every transition of the frame in the transcript and the pending log.
pub fn record_dialogue_transcript(
    time: Res<Time>,
    clock: Res<SceneClock>,
    mut transitions: MessageReader<DialogueTransitionEvent>,
    mut transcript: ResMut<DialogueTranscript>,
    mut log: ResMut<DialogueTranscriptLog>,
) {
    let now = time.elapsed_secs_f64();

    for event in transitions.read() {
        let record = TranscriptRecord {
            frame: clock.frame(),
            occurred_at_seconds: now,
            transition: event.transition.clone(),
        };
        log.push(&record);
        transcript.push(record);
    }
}

/// Appends pending transcript lines, warning once per run of failed writes.
pub fn flush_dialogue_transcript_log(mut log: ResMut<DialogueTranscriptLog>) {
    let recovering = log.failure_streak() > 0;
    match log.flush() {
        Ok(()) if recovering && log.failure_streak() == 0 => {
            info!("Dialogue transcript writes to {:?} resumed", log.path());
        }
        Ok(()) => {}
        Err(err) if log.failure_streak() == 1 => {
            warn!(
                "Failed to persist dialogue transcript to {:?}: {}. Keeping the latest lines in memory.",
                log.path(),
                err
            );
        }
        Err(_) => {}
    }
}

#[derive(Serialize)]
struct SerializableTranscriptRecord {
    frame: u64,
    occurred_at_seconds: f64,
    speaker: String,
    #[serde(flatten)]
    transition: SerializableTransition,
}

#[derive(Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
enum SerializableTransition {
    Started { name: String, line_count: usize },
    LineStarted { index: usize, line: String },
    LineRevealed { index: usize, skipped: bool },
    Closed { reason: &'static str },
}

impl From<TranscriptRecord> for SerializableTranscriptRecord {
    fn from(value: TranscriptRecord) -> Self {
        let speaker = value.transition.speaker().to_string();
        let transition = match value.transition {
            DialogueTransition::Started {
                name, line_count, ..
            } => SerializableTransition::Started { name, line_count },
            DialogueTransition::LineStarted { index, line, .. } => {
                SerializableTransition::LineStarted { index, line }
            }
            DialogueTransition::LineRevealed { index, skipped, .. } => {
                SerializableTransition::LineRevealed { index, skipped }
            }
            DialogueTransition::Closed { reason, .. } => SerializableTransition::Closed {
                reason: reason.label(),
            },
        };

        Self {
            frame: value.frame,
            occurred_at_seconds: value.occurred_at_seconds,
            speaker,
            transition,
        }
    }
}
