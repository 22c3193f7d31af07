//! The vector layer the measuring tools draw into: storage of finished
//! line strings with a vertex index for snapping, and their on-map meshes.

mod features;
mod renderer;

pub use features::*;
pub use renderer::*;

use bevy::prelude::*;

pub struct LayerPlugin;

impl Plugin for LayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DrawnFeatures>()
            .init_resource::<LayerRenderState>()
            .add_systems(PostUpdate, render_features);
    }
}
