// src/ui/dialogue_panel/systems.rs
//
// Systems spawning the dialogue panel and mirroring the scene's dialogue session into it.

use bevy::prelude::*;

use crate::dialogue::session::DialoguePhase;
use crate::scene::exploration::ExplorationScene;

use super::components::{
    DialoguePanel, DialoguePanelBody, DialoguePanelName, DialoguePanelPrompt,
    DialoguePanelSettings,
};
use super::wrap::wrap_dialogue_text;

// Visual constants
const BACKGROUND_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 0.9);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.3);
const TEXT_COLOR: Color = Color::WHITE;
const NAME_COLOR: Color = Color::srgb(1.0, 0.9, 0.4); // Yellow/gold
const PROMPT_COLOR: Color = Color::srgb(0.7, 0.7, 0.7);
const PROMPT_TEXT: &str = "[Space]";

/// Spawns the (initially hidden) panel hierarchy once at startup.
pub fn spawn_dialogue_panel(mut commands: Commands, settings: Res<DialoguePanelSettings>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(settings.bottom_offset),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-settings.panel_width * 0.5)),
                width: Val::Px(settings.panel_width),
                padding: UiRect::all(Val::Px(settings.padding)),
                border: UiRect::all(Val::Px(settings.border_width)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                display: Display::None,
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            BorderColor::from(BORDER_COLOR),
            DialoguePanel,
            Name::new("Dialogue Panel"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: settings.name_font_size,
                    ..default()
                },
                TextColor(NAME_COLOR),
                DialoguePanelName,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: settings.text_font_size,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                DialoguePanelBody,
            ));
            parent.spawn((
                Text::new(PROMPT_TEXT),
                TextFont {
                    font_size: settings.text_font_size * 0.75,
                    ..default()
                },
                TextColor(PROMPT_COLOR),
                Visibility::Hidden,
                DialoguePanelPrompt,
            ));
        });

    info!("Dialogue panel spawned");
}

/// Shows, hides and refreshes the panel from the session state.
#[allow(clippy::type_complexity)]
pub fn update_dialogue_panel(
    scene: Res<ExplorationScene>,
    settings: Res<DialoguePanelSettings>,
    mut panel_query: Query<&mut Node, With<DialoguePanel>>,
    mut name_query: Query<&mut Text, (With<DialoguePanelName>, Without<DialoguePanelBody>)>,
    mut body_query: Query<&mut Text, (With<DialoguePanelBody>, Without<DialoguePanelName>)>,
    mut prompt_query: Query<&mut Visibility, With<DialoguePanelPrompt>>,
) {
    let coordinator = scene.coordinator();
    let session = coordinator.session();

    let display = if session.is_visible() {
        Display::Flex
    } else {
        Display::None
    };
    for mut node in panel_query.iter_mut() {
        if node.display != display {
            node.display = display;
        }
    }
    if !session.is_visible() {
        return;
    }

    let name = coordinator.speaker_name().unwrap_or_default();
    for mut text in name_query.iter_mut() {
        if text.0 != name {
            text.0 = name.to_string();
        }
    }

    let body = wrap_dialogue_text(
        session.revealed_text(),
        settings.wrap_columns,
        settings.max_visible_lines,
    );
    for mut text in body_query.iter_mut() {
        if text.0 != body {
            text.0 = body.clone();
        }
    }

    let prompt = if session.phase() == DialoguePhase::AwaitingAdvance {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in prompt_query.iter_mut() {
        visibility.set_if_neq(prompt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{exploration::FrameInput, settings::SceneSettings};
    use crate::world::map::WorldMap;

    const MAP: &str = r#"{
        "width": 16, "height": 16, "tilewidth": 32, "tileheight": 32,
        "layers": [
            { "type": "objectgroup", "name": "Objects", "objects": [
                { "name": "Krishna", "x": 200.0, "y": 200.0 }
            ] }
        ]
    }"#;

    fn panel_app() -> App {
        let map = WorldMap::from_tiled_json(MAP).expect("map parses");
        let (scene, _) = ExplorationScene::on_create(&SceneSettings::default(), map);

        let mut app = App::new();
        app.insert_resource(scene)
            .insert_resource(DialoguePanelSettings::default())
            .add_systems(Startup, spawn_dialogue_panel)
            .add_systems(Update, update_dialogue_panel);
        app
    }

    fn panel_display(app: &mut App) -> Display {
        let world = app.world_mut();
        let mut query = world.query_filtered::<&Node, With<DialoguePanel>>();
        query.single(world).expect("panel spawned").display
    }

    fn talk(app: &mut App, interact: bool) {
        app.world_mut()
            .resource_mut::<ExplorationScene>()
            .on_tick(&FrameInput {
                player_position: Vec2::new(210.0, 200.0),
                interact_down: interact,
                toggle_labels_down: false,
                delta_seconds: 0.0,
            });
    }

    #[test]
    fn panel_is_hidden_without_conversation() {
        let mut app = panel_app();
        app.update();
        assert_eq!(panel_display(&mut app), Display::None);
    }

    #[test]
    fn panel_shows_speaker_and_full_line_after_skip() {
        let mut app = panel_app();
        app.update();

        talk(&mut app, true);
        talk(&mut app, false);
        talk(&mut app, true);
        app.update();

        assert_eq!(panel_display(&mut app), Display::Flex);

        let world = app.world_mut();
        let mut names = world.query_filtered::<&Text, With<DialoguePanelName>>();
        assert_eq!(names.single(world).expect("name node").0, "Krishna");

        let mut bodies = world.query_filtered::<&Text, With<DialoguePanelBody>>();
        let body = bodies.single(world).expect("body node").0.clone();
        assert_eq!(
            body.replace('\n', " "),
            "I am Krishna. Let me guide you through dharma, karma and truth."
        );
        assert!(body.lines().count() <= 5);
        assert!(body.lines().all(|line| line.chars().count() <= 62));

        let mut prompts = world.query_filtered::<&Visibility, With<DialoguePanelPrompt>>();
        assert_eq!(
            *prompts.single(world).expect("prompt node"),
            Visibility::Inherited
        );
    }
}
