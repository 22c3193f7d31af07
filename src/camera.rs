use bevy::prelude::*;
use bevy_map_viewer::{MapViewerMarker, MapViewerPlugin};
use bevy_pancam::{DirectionKeys, PanCam, PanCamPlugin};

use crate::{settings::MeasureSettings, tools::MapPointer};

/// Map viewer setup. Left click belongs to the draw tools, so the map pans
/// with the middle button and the arrow keys.
pub struct CameraSystemPlugin {
    pub settings: MeasureSettings,
}

impl Plugin for CameraSystemPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PanCamPlugin)
            .add_plugins(MapViewerPlugin {
                starting_location: self.settings.starting_location.into(),
                starting_zoom: self.settings.starting_zoom,
                tile_quality: self.settings.tile_quality,
                cache_dir: self.settings.cache_dir.clone(),
            })
            .add_systems(Update, (attach_pancam, handle_pancam));
    }
}

fn attach_pancam(
    mut commands: Commands,
    cameras: Query<Entity, (With<MapViewerMarker>, Without<PanCam>)>,
) {
    for camera in &cameras {
        debug!("Attaching pan controls to map camera {:?}", camera);
        commands.entity(camera).insert(PanCam {
            grab_buttons: vec![MouseButton::Middle],
            move_keys: DirectionKeys {
                up: vec![KeyCode::ArrowUp],
                down: vec![KeyCode::ArrowDown],
                left: vec![KeyCode::ArrowLeft],
                right: vec![KeyCode::ArrowRight],
            },
            speed: 400.,
            enabled: true,
            zoom_to_cursor: true,
            min_scale: 0.01,
            max_scale: f32::INFINITY,
            min_x: f32::NEG_INFINITY,
            max_x: f32::INFINITY,
            min_y: f32::NEG_INFINITY,
            max_y: f32::INFINITY,
        });
    }
}

fn handle_pancam(mut query: Query<&mut PanCam>, pointer: Res<MapPointer>) {
    if pointer.is_changed() {
        for mut pancam in &mut query {
            if pancam.enabled == pointer.over_ui {
                pancam.enabled = !pointer.over_ui;
            }
        }
    }
}
