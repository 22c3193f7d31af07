use bevy::{
    log::LogPlugin,
    prelude::*,
    winit::{UpdateMode, WinitSettings},
};

use bevy_egui::EguiPlugin;
use camera::CameraSystemPlugin;
use debug::DebugPlugin;
use layer::LayerPlugin;
use settings::{SettingsPlugin, load_settings};
use tools::ToolsPlugin;

pub mod camera;
pub mod debug;
pub mod layer;
pub mod settings;
pub mod tools;
pub mod types;

fn main() {
    let (settings, report) = load_settings();

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Map Measure".to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .set(LogPlugin {
                filter: settings.log_filter.clone(),
                level: settings.log_level(),
                ..Default::default()
            }),
    );
    app.add_plugins(EguiPlugin {
        enable_multipass_for_primary_context: false,
    })
    .insert_resource(report)
        .add_plugins(SettingsPlugin {
            settings: settings.clone(),
        })
        .add_plugins(DebugPlugin)
        .add_plugins(CameraSystemPlugin { settings })
        .insert_resource(WinitSettings {
            unfocused_mode: UpdateMode::Reactive {
                wait: std::time::Duration::from_secs(1),
                react_to_device_events: true,
                react_to_user_events: true,
                react_to_window_events: true,
            },
            ..Default::default()
        })
        // This should be able to be an option.
        .insert_resource(ClearColor(Color::from(Srgba {
            red: 0.9,
            green: 0.9,
            blue: 0.8,
            alpha: 1.0,
        })))
        .add_plugins(LayerPlugin)
        .add_plugins(ToolsPlugin)
        .run();
}
