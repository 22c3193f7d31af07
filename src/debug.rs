use bevy::{
    color::palettes::css::GOLD,
    diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin},
    prelude::*,
};

use crate::tools::MapPointer;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        if cfg!(debug_assertions) {
            app.add_plugins(FrameTimeDiagnosticsPlugin::default())
                .add_systems(Startup, (debug_draw_fps, debug_draw_pointer))
                .add_systems(Update, (text_update_fps, text_update_pointer));
        }
    }
}

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct PointerText;

fn overlay_text(commands: &mut Commands, label: &str, node: Node, marker: impl Component) {
    commands
        .spawn((
            Text::new(label),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            node,
        ))
        .with_child((
            TextSpan::default(),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(GOLD.into()),
            marker,
        ));
}

pub fn debug_draw_fps(mut commands: Commands) {
    overlay_text(
        &mut commands,
        "FPS: ",
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(5.0),
            right: Val::Px(5.0),
            ..default()
        },
        FpsText,
    );
}

pub fn debug_draw_pointer(mut commands: Commands) {
    overlay_text(
        &mut commands,
        "Pointer: ",
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(25.0),
            right: Val::Px(5.0),
            ..default()
        },
        PointerText,
    );
}

pub fn text_update_fps(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut TextSpan, With<FpsText>>,
) {
    for mut span in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                **span = format!("{value:.2}");
            }
        }
    }
}

/// Shows the projected coordinates under the pointer.
pub fn text_update_pointer(
    pointer: Res<MapPointer>,
    mut query: Query<&mut TextSpan, With<PointerText>>,
) {
    if !pointer.is_changed() {
        return;
    }
    for mut span in &mut query {
        **span = match pointer.position {
            Some(position) => format!("{:.1}, {:.1}", position.x, position.y),
            None => "-".to_string(),
        };
    }
}
