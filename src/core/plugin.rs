//! CorePlugin wires the frame clock and its startup logging.
use bevy::prelude::*;
#[cfg(feature = "core_debug")]
use bevy::time::TimerMode;
use std::time::Duration;

const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;
/// Longest delta a single frame may report; larger stalls are truncated.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

#[cfg(feature = "core_debug")]
#[derive(Resource)]
struct DebugTickTimer {
    timer: Timer,
}

#[cfg(feature = "core_debug")]
impl Default for DebugTickTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

/// Frame clock feeding the exploration scene one logical tick per rendered frame.
#[derive(Resource, Debug)]
pub struct SceneClock {
    time_scale: f32,
    frame: u64,
    last_real_delta: Duration,
    last_scaled_delta: Duration,
    elapsed: Duration,
}

impl SceneClock {
    /// Creates a clock with the provided time-scale multiplier.
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale: clamp_time_scale(time_scale),
            frame: 0,
            last_real_delta: Duration::ZERO,
            last_scaled_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = clamp_time_scale(scale);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Number of frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[cfg_attr(not(any(test, feature = "core_debug")), allow(dead_code))]
    pub fn last_real_delta(&self) -> Duration {
        self.last_real_delta
    }

    /// Scaled delta of the latest frame, in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.last_scaled_delta.as_secs_f32()
    }

    #[cfg_attr(not(any(test, feature = "core_debug")), allow(dead_code))]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advances one frame. The real delta is capped before scaling.
    pub fn tick(&mut self, real_delta: Duration) {
        self.frame = self.frame.wrapping_add(1);
        self.last_real_delta = real_delta;
        self.last_scaled_delta = real_delta.min(MAX_FRAME_DELTA).mul_f32(self.time_scale);
        self.elapsed += self.last_scaled_delta;
    }
}

fn clamp_time_scale(scale: f32) -> f32 {
    if scale.is_finite() {
        scale.max(MIN_TIME_SCALE)
    } else {
        DEFAULT_TIME_SCALE
    }
}

impl Default for SceneClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

/// Registers the frame clock. The time scale comes from the scene configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SceneClock::default())
            .add_systems(PostStartup, log_startup_time_scale)
            .add_systems(First, advance_scene_clock);

        #[cfg(feature = "core_debug")]
        {
            app.insert_resource(DebugTickTimer::default())
                .add_systems(Update, log_frame_ticks);
        }
    }
}

pub fn advance_scene_clock(mut clock: ResMut<SceneClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

fn log_startup_time_scale(clock: Res<SceneClock>) {
    info!("CorePlugin initialised with time scale: {:.3}", clock.time_scale());
}

#[cfg(feature = "core_debug")]
fn log_frame_ticks(mut timer: ResMut<DebugTickTimer>, clock: Res<SceneClock>) {
    if timer.timer.tick(clock.last_real_delta()).just_finished() {
        info!(
            target: "core_debug",
            "Frame {} | elapsed: {:.2}s | scale: {:.3} | dt: {:.4}s",
            clock.frame(),
            clock.elapsed().as_secs_f32(),
            clock.time_scale(),
            clock.delta_secs(),
        );
    }
}
