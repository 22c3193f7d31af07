use bevy::prelude::*;

use crate::types::Geometry;

use super::{
    DrawEnd, DrawTools, DrawingCollaborator, MeasurementMode, MeasurementResult, ToolHandle,
    ToolKind,
};

/// Registers the measurement session and the events that drive it.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DrawEnd>()
            .add_event::<ModeChanged>()
            .init_resource::<DrawTools>()
            .add_systems(Startup, start_session)
            .add_systems(Update, (apply_mode_changes, apply_draw_end).chain())
            .add_systems(Last, end_session);
    }
}

/// Raised by the UI when the user picks another measurement mode.
#[derive(Event, Debug, Clone, Copy)]
pub struct ModeChanged {
    pub mode: MeasurementMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    Idle,
    HasResult(MeasurementResult),
}

/// Interaction state of the measuring view: the active mode, the draw tool it
/// listens to and the last measured value.
#[derive(Resource, Debug)]
pub struct MeasurementSession {
    mode: MeasurementMode,
    state: SessionState,
    tool: Option<ToolHandle>,
}

impl MeasurementSession {
    /// Starts a session in distance mode with a freshly installed line tool.
    pub fn start(tools: &mut impl DrawingCollaborator) -> Self {
        let tool = tools.install_tool(ToolKind::LineString);
        Self {
            mode: MeasurementMode::Distance,
            state: SessionState::Idle,
            tool: Some(tool),
        }
    }

    pub fn mode(&self) -> MeasurementMode {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn active_tool(&self) -> Option<ToolHandle> {
        self.tool
    }

    /// The value on display, 0 until something has been measured.
    pub fn value(&self) -> f64 {
        match self.state {
            SessionState::Idle => 0.0,
            SessionState::HasResult(result) => result.value,
        }
    }

    /// Measures a finished geometry with the active mode. Geometries with too
    /// few vertices are ignored and leave the state as it was.
    pub fn drawing_finished(&mut self, geometry: &Geometry) -> bool {
        match self.mode.measure(&geometry.points) {
            Some(result) => {
                self.state = SessionState::HasResult(result);
                true
            }
            None => false,
        }
    }

    /// Handles a draw end event, skipping events from tools this session no longer listens to.
    pub fn on_draw_end(&mut self, event: &DrawEnd) -> bool {
        if self.tool != Some(event.tool) {
            debug!("Ignoring draw end from inactive tool {:?}", event.tool);
            return false;
        }
        self.drawing_finished(&event.geometry)
    }

    /// Switches mode and swaps the draw tool for a new one. The displayed value
    /// is kept until the next geometry is measured.
    pub fn change_mode(&mut self, mode: MeasurementMode, tools: &mut impl DrawingCollaborator) {
        if let Some(tool) = self.tool.take() {
            tools.remove_tool(tool);
        }
        self.tool = Some(tools.install_tool(ToolKind::LineString));
        self.mode = mode;
    }

    pub fn teardown(&mut self, tools: &mut impl DrawingCollaborator) {
        if let Some(tool) = self.tool.take() {
            tools.remove_tool(tool);
        }
    }

    pub fn display_text(&self) -> String {
        format!(
            "{}: {:.2} {}",
            self.mode.label(),
            self.value(),
            self.mode.unit_label()
        )
    }
}

pub fn start_session(mut commands: Commands, mut tools: ResMut<DrawTools>) {
    let session = MeasurementSession::start(&mut *tools);
    info!("Measurement session started in {:?} mode", session.mode());
    commands.insert_resource(session);
}

pub fn apply_mode_changes(
    mut events: EventReader<ModeChanged>,
    session: Option<ResMut<MeasurementSession>>,
    mut tools: ResMut<DrawTools>,
) {
    let Some(mut session) = session else {
        events.clear();
        return;
    };
    for event in events.read() {
        info!("Measurement mode changed to {:?}", event.mode);
        session.change_mode(event.mode, &mut *tools);
    }
}

pub fn apply_draw_end(
    mut events: EventReader<DrawEnd>,
    session: Option<ResMut<MeasurementSession>>,
) {
    let Some(mut session) = session else {
        events.clear();
        return;
    };
    for event in events.read() {
        if session.on_draw_end(event) {
            info!("{}", session.display_text());
        } else {
            debug!(
                "Geometry of {} vertices not measured in {:?} mode",
                event.geometry.len(),
                session.mode()
            );
        }
    }
}

pub fn end_session(
    mut commands: Commands,
    mut exit: EventReader<AppExit>,
    session: Option<ResMut<MeasurementSession>>,
    mut tools: ResMut<DrawTools>,
) {
    if exit.is_empty() {
        return;
    }
    exit.clear();
    if let Some(mut session) = session {
        session.teardown(&mut *tools);
        commands.remove_resource::<MeasurementSession>();
        info!("Measurement session ended");
    }
}
