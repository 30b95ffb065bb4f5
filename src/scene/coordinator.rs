//! Per-frame orchestration of proximity, dialogue and roaming.
//!
//! Each tick resolves the interaction first and only then moves the philosophers,
//! so a conversation opened this tick already freezes roaming on the same tick.
use bevy::prelude::*;

use crate::dialogue::{
    events::{CloseReason, DialogueTransition},
    session::{AdvanceOutcome, DialogueSession},
};
use crate::npc::{components::PhilosopherId, roaming::RoamingAgent};
use crate::player::proximity::find_nearby_philosopher;
use crate::world::map::CollisionMap;

/// Radius of a philosopher's body for philosopher-to-philosopher collisions.
pub const BODY_RADIUS: f32 = 12.0;

/// What the coordinator needs to know about the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    pub player_position: Vec2,
    /// One-shot interact press for this frame, already edge-detected.
    pub interact_pressed: bool,
    pub delta_seconds: f32,
}

#[derive(Debug)]
pub struct SceneCoordinator {
    philosophers: Vec<RoamingAgent>,
    session: DialogueSession,
    labels_visible: bool,
}

impl SceneCoordinator {
    pub fn new(
        philosophers: Vec<RoamingAgent>,
        session: DialogueSession,
        labels_visible: bool,
    ) -> Self {
        Self {
            philosophers,
            session,
            labels_visible,
        }
    }

    pub fn philosophers(&self) -> &[RoamingAgent] {
        &self.philosophers
    }

    pub fn philosopher(&self, id: &PhilosopherId) -> Option<&RoamingAgent> {
        self.philosophers.iter().find(|agent| agent.id() == id)
    }

    pub fn session(&self) -> &DialogueSession {
        &self.session
    }

    /// Display name of whoever the open session is talking to.
    pub fn speaker_name(&self) -> Option<&str> {
        let speaker = self.session.speaker()?;
        self.philosopher(speaker).map(RoamingAgent::name)
    }

    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    pub fn set_labels_visible(&mut self, visible: bool) {
        self.labels_visible = visible;
    }

    /// Label visibility value for each philosopher, in roster order.
    pub fn label_visibility(&self) -> impl Iterator<Item = (&PhilosopherId, bool)> + '_ {
        let visible = self.labels_visible;
        self.philosophers
            .iter()
            .map(move |agent| (agent.id(), visible))
    }

    /// Runs one frame and returns the dialogue transitions it produced, in order.
    pub fn tick(
        &mut self,
        input: &TickInput,
        collisions: &impl CollisionMap,
    ) -> Vec<DialogueTransition> {
        let mut transitions = Vec::new();

        if self.session.tick(input.delta_seconds) {
            if let Some(speaker) = self.session.speaker().cloned() {
                transitions.push(DialogueTransition::LineRevealed {
                    speaker,
                    index: self.session.line_index(),
                    skipped: false,
                });
            }
        }

        match find_nearby_philosopher(input.player_position, &self.philosophers) {
            Some(index) => {
                if input.interact_pressed {
                    if self.session.is_active() {
                        self.advance_session(&mut transitions);
                    } else {
                        self.start_session(index, &mut transitions);
                    }
                }
                if self.session.is_active() {
                    self.philosophers[index].face_player(input.player_position);
                }
            }
            None => {
                if self.session.is_active() {
                    self.close_session(CloseReason::WalkedAway, &mut transitions);
                }
            }
        }

        let frozen = self.session.is_active();
        self.update_philosophers(input.delta_seconds, frozen, collisions);

        transitions
    }

    fn start_session(&mut self, index: usize, transitions: &mut Vec<DialogueTransition>) {
        let agent = &self.philosophers[index];
        if !self.session.start(agent.id().clone(), agent.lines()) {
            return;
        }

        transitions.push(DialogueTransition::Started {
            speaker: agent.id().clone(),
            name: agent.name().to_string(),
            line_count: self.session.line_count(),
        });
        self.push_line_started(transitions);
    }

    fn advance_session(&mut self, transitions: &mut Vec<DialogueTransition>) {
        let Some(speaker) = self.session.speaker().cloned() else {
            return;
        };

        match self.session.advance_or_skip() {
            AdvanceOutcome::Ignored => {}
            AdvanceOutcome::Revealed => transitions.push(DialogueTransition::LineRevealed {
                speaker,
                index: self.session.line_index(),
                skipped: true,
            }),
            AdvanceOutcome::NextLine(_) => self.push_line_started(transitions),
            AdvanceOutcome::Finished => transitions.push(DialogueTransition::Closed {
                speaker,
                reason: CloseReason::Finished,
            }),
        }
    }

    fn close_session(&mut self, reason: CloseReason, transitions: &mut Vec<DialogueTransition>) {
        let speaker = self.session.speaker().cloned();
        if self.session.close() {
            if let Some(speaker) = speaker {
                transitions.push(DialogueTransition::Closed { speaker, reason });
            }
        }
    }

    fn push_line_started(&self, transitions: &mut Vec<DialogueTransition>) {
        let (Some(speaker), Some(line)) = (self.session.speaker(), self.session.current_line())
        else {
            return;
        };
        transitions.push(DialogueTransition::LineStarted {
            speaker: speaker.clone(),
            index: self.session.line_index(),
            line: line.to_string(),
        });
        // Empty lines are complete the moment they start.
        if !self.session.is_typing() {
            transitions.push(DialogueTransition::LineRevealed {
                speaker: speaker.clone(),
                index: self.session.line_index(),
                skipped: false,
            });
        }
    }

    /// Moves every philosopher, reverting steps into obstacles or into one another.
    fn update_philosophers(&mut self, delta: f32, frozen: bool, collisions: &impl CollisionMap) {
        for index in 0..self.philosophers.len() {
            let previous = self.philosophers[index].position();
            self.philosophers[index].update(delta, frozen);
            let moved = self.philosophers[index].position();
            if moved == previous {
                continue;
            }

            let bumped = self
                .philosophers
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .any(|(_, other)| {
                    let distance = moved.distance(other.position());
                    distance < BODY_RADIUS * 2.0 && distance < previous.distance(other.position())
                });

            if bumped || collisions.collides(moved) {
                self.philosophers[index].on_collision(previous);
            }
        }
    }
}
