//! # Interactive Tools Module
//!
//! Measuring on the map: the draw tools that turn clicks into line strings,
//! the session that measures each finished line, and the panel showing the
//! result.
//!
//! ## Sub-modules
//! - `measure`: Distance and turning angle calculations
//! - `session`: Measurement mode, active draw tool and last result
//! - `tool`: Draw tool installation and the draw end event
//! - `pointer`: Pointer position in projected map coordinates
//! - `draw`: Line string drawing with snapping
//! - `modify`: Dragging vertices of finished lines
//! - `ui`: Measurement panel and map attribution

mod draw;
mod measure;
mod modify;
mod pointer;
mod session;
mod tool;
mod ui;

pub use draw::*;
pub use measure::*;
pub use modify::*;
pub use pointer::*;
pub use session::*;
pub use tool::*;
pub use ui::*;

use bevy::prelude::*;

pub struct ToolsPlugin;

impl Plugin for ToolsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((SessionPlugin, ToolbarUiPlugin))
            .init_resource::<MapPointer>()
            .init_resource::<VertexDrag>()
            .add_systems(
                Update,
                (update_map_pointer, handle_modify, handle_draw)
                    .chain()
                    .after(bevy_egui::EguiPreUpdateSet::InitContexts)
                    .before(apply_mode_changes),
            );
    }
}
