use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::physics::{DRAG_ALPHA_TARGET, Simulation};
use super::super::render_utils::kind_style;
use super::GraphView;

const HIT_SLOP: f32 = 3.0;

/// Tracks the node held by the pointer, if any.
#[derive(Debug, Default)]
pub(in crate::app) struct DragController {
    active: Option<String>,
}

impl DragController {
    pub(in crate::app) fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Pins `index` where it is and reheats the layout.
    pub(in crate::app) fn start(&mut self, sim: &mut Simulation, index: usize) -> bool {
        let Some((id, pos)) = sim.node(index).map(|node| (node.id.clone(), node.pos)) else {
            return false;
        };
        if !sim.pin(&id, pos.x, pos.y) {
            return false;
        }

        sim.set_alpha_target(DRAG_ALPHA_TARGET);
        sim.restart();
        self.active = Some(id);
        true
    }

    pub(in crate::app) fn drag_to(&mut self, sim: &mut Simulation, world: egui::Vec2) -> bool {
        match &self.active {
            Some(id) => sim.pin(id, world.x, world.y),
            None => false,
        }
    }

    pub(in crate::app) fn end(&mut self, sim: &mut Simulation) -> bool {
        let Some(id) = self.active.take() else {
            return false;
        };
        sim.unpin(&id);
        sim.set_alpha_target(0.0);
        true
    }
}

impl GraphView {
    /// Nearest node whose marker contains the canvas-local point `local`.
    pub(in crate::app) fn node_at(&self, local: Pos2) -> Option<usize> {
        let scale = self.viewport.scale;
        self.sim
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let distance = self.viewport.to_screen(node.pos).distance(local);
                let radius = kind_style(node.kind).radius * scale + HIT_SLOP;
                (distance <= radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn begin_drag_at(&mut self, local: Pos2) -> bool {
        let Some(index) = self.node_at(local) else {
            return false;
        };
        let started = self.drag.start(&mut self.sim, index);
        if started {
            self.mark_dirty();
        }
        started
    }

    pub(in crate::app) fn drag_pointer_to(&mut self, local: Pos2) -> bool {
        let world = self.viewport.to_world(local);
        let moved = self.drag.drag_to(&mut self.sim, world);
        if moved {
            self.mark_dirty();
        }
        moved
    }

    pub(in crate::app) fn end_drag(&mut self) -> bool {
        self.drag.end(&mut self.sim)
    }

    pub(in crate::app) fn zoom_at(&mut self, local: Pos2, factor: f32) {
        self.auto_fit.interrupt();
        if self.viewport.zoom_about(local, factor) {
            self.mark_dirty();
        }
    }

    pub(in crate::app) fn pan_by(&mut self, delta: egui::Vec2) {
        self.auto_fit.interrupt();
        if self.viewport.pan_by(delta) {
            self.mark_dirty();
        }
    }

    pub(super) fn handle_pointer(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        let to_local = |pos: Pos2| Pos2::ZERO + (pos - rect.min);

        let hovered = response
            .hover_pos()
            .and_then(|pos| self.node_at(to_local(pos)));
        if hovered != self.hovered {
            self.hovered = hovered;
            self.mark_dirty();
        }
        if hovered.is_some() || self.drag.is_active() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            let grabbed = origin.is_some_and(|pos| self.begin_drag_at(to_local(pos)));
            self.panning = !grabbed;
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            if self.drag.is_active() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.drag_pointer_to(to_local(pos));
                }
            } else if self.panning {
                self.pan_by(response.drag_delta());
            }
        }

        if response.drag_stopped() {
            self.end_drag();
            self.panning = false;
        }

        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                let pointer = response
                    .hover_pos()
                    .unwrap_or_else(|| rect.center());
                let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
                self.zoom_at(to_local(pointer), zoom_factor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::app::graph::{AdaptedGraph, GraphEdge, GraphNode, NodeKind};
    use crate::app::viewport::{AutoFit, Viewport};
    use crate::config::{ViewKind, ViewProfile};

    fn function_view() -> GraphView {
        let nodes = vec![
            GraphNode::new("main", "main", NodeKind::Function),
            GraphNode::new("parse", "parse", NodeKind::Function),
            GraphNode::new("src/cli.py", "src/cli.py", NodeKind::File),
        ];
        let edges = vec![
            GraphEdge { source: 0, target: 1 },
            GraphEdge { source: 2, target: 0 },
        ];
        let graph = AdaptedGraph {
            nodes,
            edges,
            directed: true,
        };
        GraphView::new(graph, ViewProfile::for_kind(ViewKind::Function))
    }

    #[test]
    fn dragged_node_follows_pointer_exactly() {
        let mut view = function_view();
        view.viewport = Viewport {
            scale: 2.0,
            translate: vec2(-300.0, -200.0),
        };
        let grab = view.viewport.to_screen(view.sim.nodes()[1].pos);

        assert!(view.begin_drag_at(grab));
        assert_eq!(view.sim.alpha_target(), DRAG_ALPHA_TARGET);

        for step in 0..20 {
            let pointer = pos2(100.0 + step as f32 * 7.0, 80.0 + step as f32 * 3.0);
            assert!(view.drag_pointer_to(pointer));
            view.tick(1.0 / 60.0);

            let expected = view.viewport.to_world(pointer);
            assert_eq!(view.sim.nodes()[1].pos, expected);
            assert_eq!(view.sim.nodes()[1].pin, Some(expected));
        }

        assert!(view.end_drag());
        assert!(view.sim.nodes()[1].pin.is_none());
        assert_eq!(view.sim.alpha_target(), 0.0);
        assert!(!view.end_drag());
    }

    #[test]
    fn grabbing_a_settled_layout_reheats_it() {
        let mut view = function_view();
        while view.sim.advance() {}
        let frozen = view.sim.alpha();
        let grab = view.viewport.to_screen(view.sim.nodes()[0].pos);

        assert!(view.begin_drag_at(grab));
        assert!(view.sim.is_active());
        view.tick(1.0 / 60.0);
        assert!(view.sim.alpha() > frozen);
    }

    #[test]
    fn background_press_hits_nothing() {
        let mut view = function_view();
        let far = pos2(-5000.0, -5000.0);

        assert_eq!(view.node_at(far), None);
        assert!(!view.begin_drag_at(far));
        assert!(!view.drag_pointer_to(far));
    }

    #[test]
    fn user_zoom_and_pan_cancel_auto_fit() {
        let mut view = function_view();
        view.zoom_at(pos2(400.0, 300.0), 1.1);
        assert_eq!(view.auto_fit, AutoFit::Finished);

        let mut view = function_view();
        view.pan_by(vec2(15.0, -4.0));
        assert_eq!(view.auto_fit, AutoFit::Finished);
        assert_eq!(view.viewport.translate, vec2(15.0, -4.0));
    }
}
