//! Systems presenting the philosophers owned by the exploration scene.
use bevy::prelude::*;

use crate::{
    npc::{
        components::{FacingIndicator, NameLabel, PhilosopherSprite, WalkAnimation},
        roaming::RoamingAgent,
    },
    scene::{exploration::ExplorationScene, settings::SceneSettings},
    world::components::{map_to_world, MapPosition},
};

const PHILOSOPHER_SIZE: f32 = 28.0;
const PHILOSOPHER_DEPTH: f32 = 5.0;
const FALLBACK_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);
const LABEL_OFFSET: f32 = 26.0;
const LABEL_FONT_SIZE: f32 = 14.0;
const INDICATOR_SIZE: f32 = 6.0;
const INDICATOR_COLOR: Color = Color::srgb(0.1, 0.1, 0.1);

/// Spawns one sprite per placed philosopher, with a name label and a facing marker.
pub fn spawn_philosophers(
    mut commands: Commands,
    scene: Res<ExplorationScene>,
    settings: Res<SceneSettings>,
) {
    let coordinator = scene.coordinator();
    let label_visibility = visibility_for(coordinator.labels_visible());

    for agent in coordinator.philosophers() {
        let color = settings
            .philosopher(agent.id())
            .map(|config| config.color)
            .unwrap_or(FALLBACK_COLOR);

        commands
            .spawn((
                Sprite::from_color(color, Vec2::splat(PHILOSOPHER_SIZE)),
                Transform::from_translation(map_to_world(agent.position(), PHILOSOPHER_DEPTH)),
                MapPosition(agent.position()),
                PhilosopherSprite {
                    id: agent.id().clone(),
                },
                agent.animation(),
                Name::new(format!("{} ({})", agent.name(), agent.id())),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text2d::new(agent.name()),
                    TextFont {
                        font_size: LABEL_FONT_SIZE,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    Transform::from_xyz(0.0, LABEL_OFFSET, 1.0),
                    label_visibility,
                    NameLabel {
                        id: agent.id().clone(),
                    },
                ));
                parent.spawn((
                    Sprite::from_color(INDICATOR_COLOR, Vec2::splat(INDICATOR_SIZE)),
                    Transform::from_translation(indicator_offset(agent)),
                    FacingIndicator {
                        id: agent.id().clone(),
                    },
                ));
            });

        info!(
            "Spawned {} at ({:.0}, {:.0}) facing {}",
            agent.name(),
            agent.position().x,
            agent.position().y,
            agent.facing()
        );
    }
}

/// Copies positions and walk animations from the scene onto the sprites.
pub fn sync_philosopher_sprites(
    scene: Res<ExplorationScene>,
    mut sprites: Query<(
        &PhilosopherSprite,
        &mut MapPosition,
        &mut Transform,
        &mut WalkAnimation,
    )>,
    mut indicators: Query<(&FacingIndicator, &mut Transform), Without<PhilosopherSprite>>,
) {
    let coordinator = scene.coordinator();

    for (sprite, mut position, mut transform, mut animation) in sprites.iter_mut() {
        let Some(agent) = coordinator.philosopher(&sprite.id) else {
            continue;
        };
        position.0 = agent.position();
        transform.translation = position.to_translation(PHILOSOPHER_DEPTH);

        let next = agent.animation();
        if *animation != next {
            debug!("{} animation -> {} (playing: {})", sprite.id, next.key, next.playing);
            *animation = next;
        }
    }

    for (indicator, mut transform) in indicators.iter_mut() {
        if let Some(agent) = coordinator.philosopher(&indicator.id) {
            transform.translation = indicator_offset(agent);
        }
    }
}

/// Applies the scene's label toggle to every name label.
pub fn sync_name_labels(
    scene: Res<ExplorationScene>,
    mut labels: Query<(&NameLabel, &mut Visibility)>,
) {
    for (id, visible) in scene.coordinator().label_visibility() {
        for (label, mut visibility) in labels.iter_mut() {
            if &label.id == id {
                visibility.set_if_neq(visibility_for(visible));
            }
        }
    }
}

fn visibility_for(visible: bool) -> Visibility {
    if visible {
        Visibility::Visible
    } else {
        Visibility::Hidden
    }
}

/// Child offset of the facing marker; map-space steps are flipped into world space.
fn indicator_offset(agent: &RoamingAgent) -> Vec3 {
    let step = agent.facing().step() * (PHILOSOPHER_SIZE * 0.5 - INDICATOR_SIZE * 0.5);
    map_to_world(step, 1.0)
}
