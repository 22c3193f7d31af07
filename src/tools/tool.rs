use bevy::prelude::*;

use crate::types::{Geometry, Point};

/// The kinds of geometry a draw tool can capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    LineString,
}

/// Identity of one installed draw tool instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToolHandle(u64);

/// Whatever turns pointer input into geometries on the map.
///
/// Only one tool is active at a time, installing a tool replaces whatever was
/// active before and discards its unfinished sketch.
pub trait DrawingCollaborator {
    fn install_tool(&mut self, kind: ToolKind) -> ToolHandle;
    fn remove_tool(&mut self, tool: ToolHandle);
}

/// Fired once per completed drawing gesture.
#[derive(Event, Debug, Clone)]
pub struct DrawEnd {
    pub tool: ToolHandle,
    pub geometry: Geometry,
}

#[derive(Debug, Clone)]
pub struct DrawTool {
    pub handle: ToolHandle,
    pub kind: ToolKind,
    sketch: Vec<Point>,
}

#[derive(Resource, Default)]
pub struct DrawTools {
    active: Option<DrawTool>,
    next_handle: u64,
    /// Where the pointer is while a sketch is in progress, for the rubber band segment.
    pub hover: Option<Point>,
    pub respawn: bool,
}

impl DrawTools {
    pub fn active(&self) -> Option<&DrawTool> {
        self.active.as_ref()
    }

    pub fn sketch(&self) -> &[Point] {
        self.active.as_ref().map_or(&[], |tool| tool.sketch.as_slice())
    }

    pub fn is_sketching(&self) -> bool {
        !self.sketch().is_empty()
    }

    /// Appends a vertex to the active tool's sketch. Returns false when no tool is installed.
    pub fn add_vertex(&mut self, point: Point) -> bool {
        match self.active.as_mut() {
            Some(tool) => {
                tool.sketch.push(point);
                self.respawn = true;
                true
            }
            None => false,
        }
    }

    /// Completes the current sketch if it has enough vertices for its kind.
    pub fn finish(&mut self) -> Option<DrawEnd> {
        let tool = self.active.as_mut()?;
        let min_points = match tool.kind {
            ToolKind::LineString => 2,
        };
        if tool.sketch.len() < min_points {
            return None;
        }

        let geometry = Geometry::new(std::mem::take(&mut tool.sketch));
        self.hover = None;
        self.respawn = true;
        Some(DrawEnd {
            tool: tool.handle,
            geometry,
        })
    }

    pub fn abort(&mut self) {
        if let Some(tool) = self.active.as_mut() {
            if !tool.sketch.is_empty() {
                debug!("Aborting sketch of {} vertices", tool.sketch.len());
            }
            tool.sketch.clear();
        }
        self.hover = None;
        self.respawn = true;
    }
}

impl DrawingCollaborator for DrawTools {
    fn install_tool(&mut self, kind: ToolKind) -> ToolHandle {
        if let Some(previous) = self.active.take() {
            warn!("Replacing draw tool {:?} which was never removed", previous.handle);
        }
        let handle = ToolHandle(self.next_handle);
        self.next_handle += 1;
        self.active = Some(DrawTool {
            handle,
            kind,
            sketch: Vec::new(),
        });
        self.hover = None;
        self.respawn = true;
        debug!("Installed {:?} draw tool {:?}", kind, handle);
        handle
    }

    fn remove_tool(&mut self, tool: ToolHandle) {
        if self.active.as_ref().is_some_and(|active| active.handle == tool) {
            self.active = None;
            self.hover = None;
            self.respawn = true;
            debug!("Removed draw tool {:?}", tool);
        }
    }
}
