use bevy::{prelude::*, window::PrimaryWindow};
use bevy_egui::EguiContexts;
use bevy_map_viewer::{MapViewerMarker, TileMapResources};

use crate::{
    settings::MeasureSettings,
    types::{Point, coord_to_mercator},
};

/// Where the pointer is on the map this frame, in projected coordinates.
#[derive(Resource, Default, Debug)]
pub struct MapPointer {
    pub position: Option<Point>,
    /// The snap tolerance converted from screen pixels to projected units at the current zoom.
    pub tolerance: f64,
    /// Whether egui wants the pointer, in which case map tools leave it alone.
    pub over_ui: bool,
}

impl MapPointer {
    /// The pointer position when map tools may act on it.
    pub fn on_map(&self) -> Option<Point> {
        if self.over_ui { None } else { self.position }
    }
}

pub fn update_map_pointer(
    mut pointer: ResMut<MapPointer>,
    mut contexts: EguiContexts,
    camera: Query<(&Camera, &GlobalTransform), With<MapViewerMarker>>,
    q_windows: Query<&Window, With<PrimaryWindow>>,
    tile_map_manager: Res<TileMapResources>,
    settings: Res<MeasureSettings>,
) {
    let ctx = contexts.ctx_mut();
    pointer.over_ui = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
    pointer.position = None;

    let Ok((camera, camera_transform)) = camera.single() else {
        return;
    };
    let Some(cursor) = q_windows.single().ok().and_then(|window| window.cursor_position()) else {
        return;
    };

    let to_map = |screen: Vec2| {
        camera
            .viewport_to_world_2d(camera_transform, screen)
            .ok()
            .map(|world| coord_to_mercator(tile_map_manager.point_to_coord(world)))
    };

    let Some(position) = to_map(cursor) else {
        return;
    };
    let offset = cursor + Vec2::new(settings.snap_tolerance_px, 0.0);
    pointer.tolerance = to_map(offset).map_or(0.0, |edge| edge.distance(position));
    pointer.position = Some(position);
}
