use bevy::prelude::*;
use bevy_egui::{
    EguiContexts, EguiPreUpdateSet,
    egui::{self, Align2, Color32, RichText},
};

use crate::layer::DrawnFeatures;

use super::{MeasurementMode, MeasurementSession, ModeChanged, apply_mode_changes};

pub struct ToolbarUiPlugin;

impl Plugin for ToolbarUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MeasureForm>().add_systems(
            Update,
            (
                measure_ui
                    .after(EguiPreUpdateSet::InitContexts)
                    .before(apply_mode_changes),
                attribution_ui.after(EguiPreUpdateSet::InitContexts),
            ),
        );
    }
}

/// Units offered in the unit selector. The selection is only shown, it does not
/// convert the measured value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayUnit {
    #[default]
    Kilometers,
    Miles,
    Degrees,
    Radians,
}

impl DisplayUnit {
    pub const ALL: [DisplayUnit; 4] = [
        DisplayUnit::Kilometers,
        DisplayUnit::Miles,
        DisplayUnit::Degrees,
        DisplayUnit::Radians,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DisplayUnit::Kilometers => "Kilometers",
            DisplayUnit::Miles => "Miles",
            DisplayUnit::Degrees => "Degrees",
            DisplayUnit::Radians => "Radians",
        }
    }
}

/// The free standing inputs under the measurement readout.
#[derive(Resource, Debug, Default)]
pub struct MeasureForm {
    pub unit: DisplayUnit,
    pub distance: f64,
    pub angle: f64,
}

fn measure_ui(
    mut contexts: EguiContexts,
    session: Option<Res<MeasurementSession>>,
    mut form: ResMut<MeasureForm>,
    mut features: ResMut<DrawnFeatures>,
    mut mode_changed: EventWriter<ModeChanged>,
) {
    let Some(session) = session else {
        return;
    };
    let ctx = contexts.ctx_mut();

    let panel_width = 260.0;

    egui::Area::new("measure_panel".into())
        .anchor(Align2::LEFT_TOP, [10.0, 10.0])
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgba_premultiplied(30, 30, 30, 220))
                .corner_radius(10.0)
                .inner_margin(10.0)
                .shadow(egui::epaint::Shadow {
                    color: egui::Color32::from_black_alpha(60),
                    offset: [5, 5],
                    blur: 10,
                    spread: 5,
                })
                .show(ui, |ui| {
                    ui.set_width(panel_width);
                    ui.spacing_mut().item_spacing = egui::vec2(8.0, 8.0);

                    ui.heading(RichText::new("Map Measure").color(Color32::WHITE));

                    let mut mode = session.mode();
                    egui::ComboBox::from_label("Measurement Type")
                        .selected_text(mode.label())
                        .show_ui(ui, |ui| {
                            for option in MeasurementMode::ALL {
                                ui.selectable_value(&mut mode, option, option.label());
                            }
                        });
                    if mode != session.mode() {
                        mode_changed.write(ModeChanged { mode });
                    }

                    ui.label(RichText::new(session.display_text()).color(Color32::WHITE));
                    ui.separator();

                    egui::ComboBox::from_label("Unit")
                        .selected_text(form.unit.label())
                        .show_ui(ui, |ui| {
                            for unit in DisplayUnit::ALL {
                                ui.selectable_value(&mut form.unit, unit, unit.label());
                            }
                        });

                    ui.horizontal(|ui| {
                        ui.label("Distance");
                        ui.add(egui::DragValue::new(&mut form.distance).range(0.0..=f64::MAX));
                    });
                    ui.horizontal(|ui| {
                        ui.label("Angle");
                        ui.add(egui::DragValue::new(&mut form.angle).range(0.0..=360.0));
                    });
                    ui.separator();

                    if ui
                        .add_enabled(!features.is_empty(), egui::Button::new("Clear drawings"))
                        .on_hover_text("Removes every line drawn on the map")
                        .clicked()
                    {
                        info!("Clearing {} drawn features", features.len());
                        features.clear();
                    }
                });
        });
}

fn attribution_ui(mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();

    egui::Area::new("attribution".into())
        .anchor(Align2::RIGHT_BOTTOM, [-5.0, -5.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgba_premultiplied(255, 255, 255, 180))
                .corner_radius(4.0)
                .inner_margin(4.0)
                .show(ui, |ui| {
                    ui.label(
                        RichText::new("© OpenStreetMap contributors")
                            .small()
                            .color(Color32::BLACK),
                    );
                });
        });
}
