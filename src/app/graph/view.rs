use eframe::egui::{Align2, Color32, FontId, Sense, Ui, Vec2, vec2};

use crate::config::ViewProfile;

use super::super::physics::{Simulation, SimulationParams};
use super::super::render::{Frame, PainterSurface};
use super::super::render_utils::draw_background;
use super::super::viewport::{AutoFit, Viewport};
use super::{AdaptedGraph, DragController};

const MAX_FRAME_SECS: f32 = 1.0 / 20.0;
const MIN_CANVAS: Vec2 = vec2(240.0, 180.0);

/// Preferred canvas size shrunk to what the panel can show.
fn fit_canvas(preferred: Vec2, available: Vec2) -> Vec2 {
    preferred.min(available).max(MIN_CANVAS)
}

/// One rendered graph: its simulation, viewport, drag state and last frame.
///
/// Built from scratch for every load and dropped as a whole when the next
/// load arrives.
pub(in crate::app) struct GraphView {
    pub(super) sim: Simulation,
    pub(super) viewport: Viewport,
    pub(super) auto_fit: AutoFit,
    pub(super) drag: DragController,
    pub(super) profile: ViewProfile,
    pub(super) directed: bool,
    pub(super) hovered: Option<usize>,
    pub(super) panning: bool,
    canvas: Vec2,
    frame: Frame,
    frame_dirty: bool,
}

impl GraphView {
    pub(in crate::app) fn new(graph: AdaptedGraph, profile: ViewProfile) -> Self {
        let directed = graph.directed || profile.directed;
        let sim = Simulation::new(graph, SimulationParams::from_profile(&profile));

        Self {
            sim,
            viewport: Viewport::default(),
            auto_fit: AutoFit::default(),
            drag: DragController::default(),
            profile,
            directed,
            hovered: None,
            panning: false,
            canvas: profile.canvas_size,
            frame: Frame::default(),
            frame_dirty: true,
        }
    }

    pub(in crate::app) fn node_count(&self) -> usize {
        self.sim.nodes().len()
    }

    pub(in crate::app) fn edge_count(&self) -> usize {
        self.sim.edges().len()
    }

    pub(in crate::app) fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub(in crate::app) fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub(super) fn mark_dirty(&mut self) {
        self.frame_dirty = true;
    }

    /// Advances layout and auto-fit by one host frame. Returns whether more
    /// frames are needed.
    pub(in crate::app) fn tick(&mut self, dt: f32) -> bool {
        if self.sim.advance() {
            self.frame_dirty = true;
        }

        let bounds = self.sim.bounds();
        if self.auto_fit.tick(
            dt.clamp(0.0, MAX_FRAME_SECS),
            !self.sim.is_active(),
            &mut self.viewport,
            bounds,
            self.canvas,
        ) {
            self.frame_dirty = true;
        }

        self.sim.is_active() || self.auto_fit.is_pending() || self.drag.is_active()
    }

    pub(in crate::app) fn frame(&mut self) -> &Frame {
        if self.frame_dirty {
            self.frame = Frame::build(&self.sim, &self.viewport, self.directed, self.hovered);
            self.frame_dirty = false;
        }
        &self.frame
    }

    pub(in crate::app) fn show(&mut self, ui: &mut Ui) {
        self.canvas = fit_canvas(self.profile.canvas_size, ui.available_size());
        let (rect, response) = ui.allocate_exact_size(self.canvas, Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, &self.viewport);
        self.handle_pointer(ui, rect, &response);

        let dt = ui.ctx().input(|input| input.stable_dt);
        if self.tick(dt) {
            ui.ctx().request_repaint();
        }

        let frame = self.frame();
        if !frame.is_empty() {
            frame.paint(&mut PainterSurface::new(&painter, rect.min));
        }

        if let Some(node) = self.hovered.and_then(|index| self.sim.node(index)) {
            let mut panel_text = format!("{}  |  {}", node.label, node.kind.label());
            if let Some(file) = &node.file {
                panel_text.push_str(&format!("  |  {file}"));
                if let Some(line) = node.line {
                    panel_text.push_str(&format!(":{line}"));
                }
            }
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(40),
            );
        }
    }
}
