//! Dialogue plugin wiring transition messages and the transcript.
use bevy::prelude::*;

use crate::scene::systems::tick_exploration_scene;

use super::{
    events::DialogueTransitionEvent,
    transcript::{
        flush_dialogue_transcript_log, record_dialogue_transcript, DialogueTranscript,
        DialogueTranscriptLog,
    },
};

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogueTranscript>()
            .init_resource::<DialogueTranscriptLog>()
            .add_message::<DialogueTransitionEvent>()
            .add_systems(
                Update,
                (record_dialogue_transcript, flush_dialogue_transcript_log)
                    .chain()
                    .after(tick_exploration_scene),
            );
    }
}
