use bevy::prelude::*;

use crate::{
    layer::{DrawnFeatures, VertexRef},
    types::Point,
};

use super::{DrawTools, MapPointer};

/// A vertex of a finished feature being dragged around.
#[derive(Resource, Default, Debug)]
pub struct VertexDrag {
    pub grabbed: Option<VertexRef>,
    /// Pointer position when the vertex was grabbed.
    pub anchor: Option<Point>,
    pub moved: bool,
    /// Set on the frame a drag that moved something ends, so the release is not
    /// also taken as a draw click.
    pub released_this_frame: bool,
}

pub fn handle_modify(
    mut drag: ResMut<VertexDrag>,
    mut features: ResMut<DrawnFeatures>,
    tools: Res<DrawTools>,
    pointer: Res<MapPointer>,
    buttons: Res<ButtonInput<MouseButton>>,
) {
    drag.released_this_frame = false;

    if let Some(vertex) = drag.grabbed {
        if let Some(position) = pointer.position {
            if drag.moved || drag.anchor != Some(position) {
                drag.moved = true;
                if features.vertex(vertex) != Some(position) {
                    features.move_vertex(vertex, position);
                }
            }
        }
        if !buttons.pressed(MouseButton::Left) {
            debug!("Released vertex {:?}", vertex);
            drag.grabbed = None;
            drag.anchor = None;
            drag.released_this_frame = drag.moved;
            drag.moved = false;
        }
        return;
    }

    // Editing is only offered between sketches.
    if tools.is_sketching() || !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    if let Some(position) = pointer.on_map() {
        if let Some((vertex, _)) = features.nearest_vertex(position, pointer.tolerance) {
            debug!("Grabbed vertex {:?}", vertex);
            drag.grabbed = Some(vertex);
            drag.anchor = Some(position);
        }
    }
}
