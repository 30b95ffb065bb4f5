// src/ui/dialogue_panel/components.rs
//
// Components and resources for the dialogue panel.

use bevy::prelude::*;

/// Root node of the dialogue panel. Hidden while no conversation is open.
#[derive(Component, Debug)]
pub struct DialoguePanel;

/// Text node showing the speaker's display name.
#[derive(Component, Debug)]
pub struct DialoguePanelName;

/// Text node showing the revealed part of the current line.
#[derive(Component, Debug)]
pub struct DialoguePanelBody;

/// Prompt shown once the current line is fully revealed.
#[derive(Component, Debug)]
pub struct DialoguePanelPrompt;

/// Resource containing layout settings for the dialogue panel.
#[derive(Resource, Debug)]
pub struct DialoguePanelSettings {
    /// Panel width (pixels).
    pub panel_width: f32,

    /// Offset from bottom edge of screen (pixels).
    pub bottom_offset: f32,

    /// Padding inside panel (pixels).
    pub padding: f32,

    /// Border width (pixels).
    pub border_width: f32,

    /// Characters per wrapped line.
    pub wrap_columns: usize,

    /// Wrapped lines kept visible; older lines scroll out.
    pub max_visible_lines: usize,

    /// Font size for the speaker name (points).
    pub name_font_size: f32,

    /// Font size for dialogue text (points).
    pub text_font_size: f32,
}

impl Default for DialoguePanelSettings {
    fn default() -> Self {
        Self {
            panel_width: 680.0,
            bottom_offset: 24.0,
            padding: 14.0,
            border_width: 2.0,
            wrap_columns: 62,
            max_visible_lines: 5,
            name_font_size: 20.0,
            text_font_size: 18.0,
        }
    }
}
