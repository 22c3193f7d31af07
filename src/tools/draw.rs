use bevy::prelude::*;

use crate::layer::DrawnFeatures;

use super::{DrawEnd, DrawTools, MapPointer, VertexDrag};

/// Turns clicks into line strings for the active draw tool.
///
/// Left click adds a vertex, clicking the last vertex again (or Enter) finishes
/// the line, right click or Escape throws the sketch away.
pub fn handle_draw(
    mut tools: ResMut<DrawTools>,
    mut features: ResMut<DrawnFeatures>,
    mut draw_end: EventWriter<DrawEnd>,
    pointer: Res<MapPointer>,
    drag: Res<VertexDrag>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
) {
    if tools.active().is_none() {
        return;
    }

    if keys.just_pressed(KeyCode::Escape)
        || (buttons.just_pressed(MouseButton::Right) && pointer.on_map().is_some())
    {
        tools.abort();
        return;
    }

    let mut finished = keys.just_pressed(KeyCode::Enter);

    if let Some(position) = pointer.on_map() {
        if tools.is_sketching() && tools.hover != Some(position) {
            tools.hover = Some(position);
            tools.respawn = true;
        }

        if buttons.just_released(MouseButton::Left) && !drag.released_this_frame {
            let sketch = tools.sketch();
            let on_last = sketch
                .last()
                .is_some_and(|last| last.distance(position) <= pointer.tolerance);

            if on_last {
                finished = sketch.len() >= 2;
            } else {
                let vertex = features.snap(position, pointer.tolerance);
                tools.add_vertex(vertex);
            }
        }
    }

    if finished {
        if let Some(event) = tools.finish() {
            debug!("Finished line string of {} vertices", event.geometry.len());
            features.add(event.geometry.clone());
            draw_end.write(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::DVec2;

    use super::*;
    use crate::tools::{MeasurementSession, SessionPlugin, apply_mode_changes, handle_modify};

    fn drawing_app() -> App {
        let mut app = App::new();
        app.add_plugins(SessionPlugin)
            .init_resource::<DrawnFeatures>()
            .init_resource::<VertexDrag>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(MapPointer {
                position: None,
                tolerance: 1.0,
                over_ui: false,
            })
            .add_systems(
                Update,
                (handle_modify, handle_draw)
                    .chain()
                    .before(apply_mode_changes),
            );
        app.update();
        app
    }

    fn point_at(app: &mut App, x: f64, y: f64) {
        app.world_mut().resource_mut::<MapPointer>().position = Some(DVec2::new(x, y));
    }

    fn step(app: &mut App, change: impl FnOnce(&mut ButtonInput<MouseButton>)) {
        {
            let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
            buttons.clear();
            change(&mut buttons);
        }
        app.update();
    }

    fn click(app: &mut App, x: f64, y: f64) {
        point_at(app, x, y);
        step(app, |buttons| buttons.press(MouseButton::Left));
        step(app, |buttons| buttons.release(MouseButton::Left));
    }

    #[test]
    fn clicking_the_last_vertex_finishes_and_measures() {
        let mut app = drawing_app();
        click(&mut app, 0.0, 0.0);
        click(&mut app, 0.0, 10.0);
        assert_eq!(app.world().resource::<DrawTools>().sketch().len(), 2);

        click(&mut app, 0.0, 10.0);

        assert!(!app.world().resource::<DrawTools>().is_sketching());
        assert_eq!(app.world().resource::<DrawnFeatures>().len(), 1);
        let session = app.world().resource::<MeasurementSession>();
        assert_eq!(session.display_text(), "Distance: 10.00 units");
    }

    #[test]
    fn single_vertex_cannot_be_finished() {
        let mut app = drawing_app();
        click(&mut app, 0.0, 0.0);
        click(&mut app, 0.0, 0.0);

        assert_eq!(app.world().resource::<DrawTools>().sketch().len(), 1);
        assert!(app.world().resource::<DrawnFeatures>().is_empty());
    }

    #[test]
    fn escape_throws_the_sketch_away() {
        let mut app = drawing_app();
        click(&mut app, 0.0, 0.0);
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        app.update();

        assert!(!app.world().resource::<DrawTools>().is_sketching());
    }

    #[test]
    fn clicks_over_the_ui_are_ignored() {
        let mut app = drawing_app();
        app.world_mut().resource_mut::<MapPointer>().over_ui = true;
        click(&mut app, 0.0, 0.0);

        assert!(!app.world().resource::<DrawTools>().is_sketching());
    }

    #[test]
    fn new_vertices_snap_onto_existing_features() {
        let mut app = drawing_app();
        click(&mut app, 0.0, 0.0);
        click(&mut app, 0.0, 10.0);
        click(&mut app, 0.0, 10.0);

        click(&mut app, 0.5, 5.0);
        assert_eq!(
            app.world().resource::<DrawTools>().sketch(),
            &[DVec2::new(0.0, 5.0)]
        );
    }

    #[test]
    fn dragging_a_vertex_edits_without_measuring() {
        let mut app = drawing_app();
        click(&mut app, 0.0, 0.0);
        click(&mut app, 0.0, 10.0);
        click(&mut app, 0.0, 10.0);

        point_at(&mut app, 0.0, 10.5);
        step(&mut app, |buttons| buttons.press(MouseButton::Left));
        point_at(&mut app, 5.0, 10.0);
        step(&mut app, |_| {});
        step(&mut app, |buttons| buttons.release(MouseButton::Left));

        let features = app.world().resource::<DrawnFeatures>();
        assert_eq!(features.features()[0].points[1], DVec2::new(5.0, 10.0));
        assert!(!app.world().resource::<DrawTools>().is_sketching());
        let session = app.world().resource::<MeasurementSession>();
        assert_eq!(session.display_text(), "Distance: 10.00 units");
    }

    #[test]
    fn pressing_a_vertex_without_moving_starts_a_sketch() {
        let mut app = drawing_app();
        click(&mut app, 0.0, 0.0);
        click(&mut app, 0.0, 10.0);
        click(&mut app, 0.0, 10.0);

        click(&mut app, 0.0, 10.0);

        assert_eq!(
            app.world().resource::<DrawTools>().sketch(),
            &[DVec2::new(0.0, 10.0)]
        );
        let features = app.world().resource::<DrawnFeatures>();
        assert_eq!(features.features()[0].points[1], DVec2::new(0.0, 10.0));
    }
}
