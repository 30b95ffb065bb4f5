//! Autonomous roaming state machine driving each philosopher.
//!
//! An agent alternates between pausing and walking in one of the four cardinal
//! directions. Decisions are re-rolled whenever a timer expires, the agent bumps
//! into something, or it is outside its roam radius and still heading away from
//! its origin. A frozen agent neither moves nor consumes its timers, so a
//! conversation pauses the roaming exactly where it was.
use bevy::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::components::{Facing, PhilosopherId, WalkAnimation};
use super::config::{PhilosopherConfig, RoamingSettings};

/// Distance (world pixels) at which the player can talk to a philosopher.
pub const INTERACTION_RADIUS: f32 = 50.0;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Derives a per-agent seed so roster order alone decides each agent's stream.
pub fn agent_seed(scene_seed: u64, roster_index: usize) -> u64 {
    scene_seed ^ (roster_index as u64 + 1).wrapping_mul(MIXING_CONSTANT)
}

/// Behaviour state with the time left before the next decision, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoamState {
    Idle { remaining: f32 },
    Moving { direction: Facing, remaining: f32 },
}

impl RoamState {
    pub fn is_moving(&self) -> bool {
        matches!(self, Self::Moving { .. })
    }
}

#[derive(Debug, Clone)]
pub struct RoamingAgent {
    id: PhilosopherId,
    name: String,
    lines: Vec<String>,
    origin: Vec2,
    position: Vec2,
    facing: Facing,
    state: RoamState,
    frozen: bool,
    settings: RoamingSettings,
    rng: SmallRng,
}

impl RoamingAgent {
    /// Places a new agent at `origin`, pausing before its first walk.
    pub fn new(config: &PhilosopherConfig, origin: Vec2, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let settings = config.roaming.clone().sanitised();
        let remaining = sample_seconds(&mut rng, settings.idle_seconds);

        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            lines: config.dialogue_lines(),
            origin,
            position: origin,
            facing: config.default_direction,
            state: RoamState::Idle { remaining },
            frozen: false,
            settings,
            rng,
        }
    }

    pub fn id(&self) -> &PhilosopherId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Conversation script used when the player talks to this agent.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn state(&self) -> RoamState {
        self.state
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn roam_radius(&self) -> f32 {
        self.settings.roam_radius
    }

    pub fn distance_from_origin(&self) -> f32 {
        self.position.distance(self.origin)
    }

    /// Advances the behaviour by `delta` seconds unless `frozen`.
    pub fn update(&mut self, delta: f32, frozen: bool) {
        self.frozen = frozen;
        if frozen || delta <= 0.0 {
            return;
        }

        match self.state {
            RoamState::Idle { remaining } => {
                let remaining = remaining - delta;
                if remaining > 0.0 {
                    self.state = RoamState::Idle { remaining };
                } else {
                    self.finish_idle();
                }
            }
            RoamState::Moving {
                direction,
                remaining,
            } => {
                self.position += direction.step() * self.settings.move_speed * delta;
                self.facing = direction;
                let remaining = remaining - delta;
                let drifting_out = !self.within_radius() && self.increases_distance(direction);
                if remaining <= 0.0 || drifting_out {
                    self.finish_move(direction);
                } else {
                    self.state = RoamState::Moving {
                        direction,
                        remaining,
                    };
                }
            }
        }
    }

    /// Physics rejected the last step: snap back to `resolved` and re-decide.
    ///
    /// A step may have already settled into `Idle`; if snapping back leaves the agent
    /// outside its radius it walks back in instead of resting there.
    pub fn on_collision(&mut self, resolved: Vec2) {
        self.position = resolved;
        match self.state {
            RoamState::Moving { direction, .. } => self.finish_move(direction),
            RoamState::Idle { .. } if !self.within_radius() => {
                let direction = self.pick_direction(None);
                self.enter_moving(direction);
            }
            RoamState::Idle { .. } => {}
        }
    }

    /// Turns towards the player without touching the roaming state.
    pub fn face_player(&mut self, player: Vec2) {
        self.facing = Facing::towards(player - self.position);
    }

    pub fn is_player_nearby(&self, player: Vec2) -> bool {
        self.position.distance(player) <= INTERACTION_RADIUS
    }

    pub fn animation(&self) -> WalkAnimation {
        WalkAnimation {
            key: format!("{}-{}-walk", self.id, self.facing),
            playing: self.state.is_moving() && !self.frozen,
        }
    }

    fn finish_idle(&mut self) {
        if self.within_radius() && self.roll(self.settings.pause_chance) {
            self.enter_idle();
        } else {
            let direction = self.pick_direction(None);
            self.enter_moving(direction);
        }
    }

    fn finish_move(&mut self, current: Facing) {
        if self.roll(self.settings.direction_change_chance) {
            if self.within_radius() && self.roll(0.5) {
                self.enter_idle();
            } else {
                let direction = self.pick_direction(Some(current));
                self.enter_moving(direction);
            }
        } else if !self.within_radius() && self.increases_distance(current) {
            let direction = self.pick_direction(Some(current));
            self.enter_moving(direction);
        } else {
            self.enter_moving(current);
        }
    }

    fn enter_idle(&mut self) {
        let remaining = sample_seconds(&mut self.rng, self.settings.idle_seconds);
        self.state = RoamState::Idle { remaining };
    }

    fn enter_moving(&mut self, direction: Facing) {
        let remaining = sample_seconds(&mut self.rng, self.settings.move_seconds);
        self.facing = direction;
        self.state = RoamState::Moving {
            direction,
            remaining,
        };
    }

    /// Uniform pick; at or beyond the radius only directions leading back are allowed.
    fn pick_direction(&mut self, avoid: Option<Facing>) -> Facing {
        let at_edge = self.distance_from_origin() >= self.settings.roam_radius;
        let mut candidates: Vec<Facing> = Facing::ALL
            .into_iter()
            .filter(|direction| !at_edge || !self.increases_distance(*direction))
            .collect();
        if candidates.is_empty() {
            candidates = Facing::ALL.to_vec();
        }
        if let Some(avoid) = avoid {
            if candidates.len() > 1 {
                candidates.retain(|direction| *direction != avoid);
            }
        }

        candidates
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(self.facing)
    }

    fn within_radius(&self) -> bool {
        self.distance_from_origin() <= self.settings.roam_radius
    }

    /// Any step along `direction` moves further from the origin.
    fn increases_distance(&self, direction: Facing) -> bool {
        (self.position - self.origin).dot(direction.step()) >= 0.0
    }

    fn roll(&mut self, chance: f32) -> bool {
        self.rng.gen_bool(f64::from(chance.clamp(0.0, 1.0)))
    }
}

fn sample_seconds(rng: &mut SmallRng, (min, max): (f32, f32)) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}
