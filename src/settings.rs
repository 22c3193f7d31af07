use std::{fs, path::{Path, PathBuf}, str::FromStr};

use anyhow::Context;
use bevy::{log::Level, prelude::*};
use bevy_map_viewer::Coord;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "settings.json";

/// Start-up configuration of the viewer, read once before the app is built.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeasureSettings {
    pub starting_location: StartingLocation,
    pub starting_zoom: u32,
    // This can be changed, it changes the size of each tile too.
    pub tile_quality: f64,
    pub cache_dir: String,
    /// How close, in screen pixels, the pointer must be to a vertex or edge to snap onto it.
    pub snap_tolerance_px: f32,
    pub log_filter: String,
    pub log_level: String,
    pub style: FeatureStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartingLocation {
    pub lat: f32,
    pub lon: f32,
}

impl From<StartingLocation> for Coord {
    fn from(location: StartingLocation) -> Self {
        Coord::new(location.lat, location.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureStyle {
    pub stroke_color: [u8; 4],
    pub stroke_width_px: f32,
    pub vertex_color: [u8; 4],
    pub vertex_radius_px: f32,
}

impl Default for FeatureStyle {
    fn default() -> Self {
        Self {
            stroke_color: [0xff, 0xcc, 0x33, 0xff],
            stroke_width_px: 2.0,
            vertex_color: [0xff, 0xcc, 0x33, 0xff],
            vertex_radius_px: 7.0,
        }
    }
}

impl FeatureStyle {
    pub fn stroke(&self) -> Color {
        let [r, g, b, a] = self.stroke_color;
        Color::srgba_u8(r, g, b, a)
    }

    pub fn vertex(&self) -> Color {
        let [r, g, b, a] = self.vertex_color;
        Color::srgba_u8(r, g, b, a)
    }
}

impl Default for MeasureSettings {
    fn default() -> Self {
        Self {
            starting_location: StartingLocation { lat: 52.1951, lon: 0.1313 },
            starting_zoom: 14,
            tile_quality: 256.0,
            cache_dir: "cache".to_string(),
            snap_tolerance_px: 10.0,
            log_filter: "wgpu=error,naga=warn".to_string(),
            log_level: "info".to_string(),
            style: FeatureStyle::default(),
        }
    }
}

impl MeasureSettings {
    /// Platform config location, e.g. `~/.config/map-measure/settings.json`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "map-measure").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Reads settings from `path`. A missing file is not an error and yields the defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let settings: Self = serde_json::from_str(raw)?;
        anyhow::ensure!(
            settings.snap_tolerance_px >= 0.0,
            "snap_tolerance_px must not be negative"
        );
        Ok(settings)
    }

    pub fn log_level(&self) -> Level {
        Level::from_str(&self.log_level).unwrap_or(Level::INFO)
    }
}

/// The settings in use plus whatever went wrong loading them, kept so the
/// problem can be logged once logging is up.
#[derive(Resource, Default)]
pub struct SettingsReport {
    pub path: Option<PathBuf>,
    pub error: Option<String>,
}

pub fn load_settings() -> (MeasureSettings, SettingsReport) {
    let path = MeasureSettings::default_path();
    let result = match &path {
        Some(path) => MeasureSettings::load_from(path),
        None => Ok(MeasureSettings::default()),
    };
    match result {
        Ok(settings) => (settings, SettingsReport { path, error: None }),
        Err(err) => (
            MeasureSettings::default(),
            SettingsReport {
                path,
                error: Some(format!("{err:#}")),
            },
        ),
    }
}

pub struct SettingsPlugin {
    pub settings: MeasureSettings,
}

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .init_resource::<SettingsReport>()
            .add_systems(Startup, report_settings);
    }
}

fn report_settings(report: Res<SettingsReport>, settings: Res<MeasureSettings>) {
    match (&report.path, &report.error) {
        (_, Some(error)) => warn!("Falling back to default settings: {}", error),
        (Some(path), None) => info!("Settings resolved from {}", path.display()),
        (None, None) => info!("No config directory available, using default settings"),
    }
    debug!("{:?}", *settings);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(MeasureSettings::from_json("{}").unwrap(), MeasureSettings::default());
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let settings = MeasureSettings::from_json(
            r#"{ "starting_zoom": 2, "style": { "stroke_width_px": 4.0 } }"#,
        )
        .unwrap();
        assert_eq!(settings.starting_zoom, 2);
        assert_eq!(settings.style.stroke_width_px, 4.0);
        assert_eq!(settings.style.vertex_radius_px, 7.0);
        assert_eq!(settings.snap_tolerance_px, 10.0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(MeasureSettings::from_json(r#"{ "zoom": 3 }"#).is_err());
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        assert!(MeasureSettings::from_json(r#"{ "snap_tolerance_px": -1.0 }"#).is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("map-measure-missing").join(SETTINGS_FILE);
        assert_eq!(MeasureSettings::load_from(&path).unwrap(), MeasureSettings::default());
    }

    #[test]
    fn unparsable_file_reports_its_path() {
        let dir = std::env::temp_dir().join(format!("map-measure-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SETTINGS_FILE);
        fs::write(&path, "not json").unwrap();

        let err = MeasureSettings::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains(SETTINGS_FILE));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let settings = MeasureSettings {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.log_level(), Level::INFO);
    }
}
