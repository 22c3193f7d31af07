use bevy::{prelude::*, render::view::RenderLayers};
use bevy_map_viewer::{MapViewerMarker, TileMapResources, ZoomChangedEvent};

use crate::{
    settings::MeasureSettings,
    tools::DrawTools,
    types::{Point, mercator_to_coord},
};

use super::DrawnFeatures;

#[derive(Component, Clone, Copy)]
pub struct FeatureMarker;

#[derive(Component, Clone, Copy)]
pub struct SketchMarker;

/// Camera scale the meshes were last built for, so line widths stay constant on screen.
#[derive(Resource, Default)]
pub struct LayerRenderState {
    scale: f32,
}

fn camera_scale(projection: &Projection) -> f32 {
    match projection {
        Projection::Orthographic(orthographic) => orthographic.scale,
        _ => 1.0,
    }
}

// Find a way to reduce this by say using a ParamSet
#[allow(clippy::too_many_arguments)]
pub fn render_features(
    mut commands: Commands,
    mut features: ResMut<DrawnFeatures>,
    mut tools: ResMut<DrawTools>,
    mut render_state: ResMut<LayerRenderState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut zoom_change: EventReader<ZoomChangedEvent>,
    feature_query: Query<Entity, With<FeatureMarker>>,
    sketch_query: Query<Entity, With<SketchMarker>>,
    camera: Query<&Projection, With<MapViewerMarker>>,
    tile_map_manager: Res<TileMapResources>,
    settings: Res<MeasureSettings>,
) {
    let scale = camera.single().map_or(1.0, camera_scale);
    let rescaled = (scale - render_state.scale).abs() > f32::EPSILON;
    let zoomed = !zoom_change.is_empty();
    zoom_change.clear();

    if !(features.respawn || tools.respawn || rescaled || zoomed) {
        return;
    }
    render_state.scale = scale;

    let style = &settings.style;
    let brush = Brush {
        line_width: style.stroke_width_px * scale,
        vertex_radius: style.vertex_radius_px * scale,
        stroke: materials.add(style.stroke()),
        vertex: materials.add(style.vertex()),
    };
    let to_world =
        |point: &Point| mercator_to_coord(*point).to_game_coords(tile_map_manager.clone());

    if features.respawn || rescaled || zoomed {
        features.respawn = false;
        for entity in feature_query.iter() {
            commands.entity(entity).despawn();
        }
        for geometry in features.features() {
            let points: Vec<Vec2> = geometry.points.iter().map(to_world).collect();
            brush.spawn_line(&mut commands, &mut meshes, &points, FeatureMarker);
        }
    }

    if tools.respawn || rescaled || zoomed {
        tools.respawn = false;
        for entity in sketch_query.iter() {
            commands.entity(entity).despawn();
        }
        let mut points: Vec<Vec2> = tools.sketch().iter().map(to_world).collect();
        if let (false, Some(hover)) = (points.is_empty(), tools.hover) {
            points.push(to_world(&hover));
        }
        brush.spawn_line(&mut commands, &mut meshes, &points, SketchMarker);
    }
}

struct Brush {
    line_width: f32,
    vertex_radius: f32,
    stroke: Handle<ColorMaterial>,
    vertex: Handle<ColorMaterial>,
}

impl Brush {
    fn spawn_line(
        &self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        points: &[Vec2],
        marker: impl Component + Copy,
    ) {
        let elevation = 1000.0;

        for pair in points.windows(2) {
            let direction = pair[1] - pair[0];
            let angle = direction.y.atan2(direction.x);
            let midpoint = (pair[0] + pair[1]) / 2.0;

            commands.spawn((
                Mesh2d(meshes.add(Rectangle::new(direction.length(), self.line_width))),
                Transform::from_translation(midpoint.extend(elevation))
                    .with_rotation(Quat::from_rotation_z(angle)),
                MeshMaterial2d(self.stroke.clone()),
                RenderLayers::layer(1),
                marker,
            ));
        }

        for point in points {
            commands.spawn((
                Mesh2d(meshes.add(Circle::new(self.vertex_radius))),
                Transform::from_translation(point.extend(elevation + 1.0)),
                MeshMaterial2d(self.vertex.clone()),
                RenderLayers::layer(1),
                marker,
            ));
        }
    }
}
