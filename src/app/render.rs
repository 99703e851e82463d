use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Shape, Stroke, Vec2, vec2};

use super::physics::Simulation;
use super::render_utils::{
    EDGE_COLOR, EDGE_WIDTH, LABEL_COLOR, OUTLINE_WIDTH, blend_color, kind_style,
};
use super::viewport::Viewport;

const LABEL_OFFSET: Vec2 = vec2(12.0, 4.0);
const ARROW_GAP: f32 = 2.0;
const ARROW_LENGTH: f32 = 8.0;
const ARROW_HALF_WIDTH: f32 = 4.0;

/// Drawing target for a [`Frame`], in canvas-local coordinates.
pub(in crate::app) trait Surface {
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);
    fn polygon(&mut self, points: &[Pos2], fill: Color32);
    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, outline: Stroke);
    fn text(&mut self, anchor: Pos2, text: &str, size: f32, color: Color32);
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct EdgeLine {
    pub(in crate::app) from: Pos2,
    pub(in crate::app) to: Pos2,
    pub(in crate::app) stroke: Stroke,
    pub(in crate::app) arrow: Option<[Pos2; 3]>,
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct NodeMarker {
    pub(in crate::app) center: Pos2,
    pub(in crate::app) radius: f32,
    pub(in crate::app) fill: Color32,
    pub(in crate::app) outline: Stroke,
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct NodeLabel {
    pub(in crate::app) anchor: Pos2,
    pub(in crate::app) text: String,
    pub(in crate::app) size: f32,
    pub(in crate::app) color: Color32,
}

/// Screen-space primitives for one tick of a graph view.
#[derive(Clone, Debug, Default, PartialEq)]
pub(in crate::app) struct Frame {
    pub(in crate::app) edges: Vec<EdgeLine>,
    pub(in crate::app) markers: Vec<NodeMarker>,
    pub(in crate::app) labels: Vec<NodeLabel>,
}

impl Frame {
    pub(in crate::app) fn build(
        sim: &Simulation,
        viewport: &Viewport,
        directed: bool,
        hovered: Option<usize>,
    ) -> Self {
        let nodes = sim.nodes();
        let scale = viewport.scale;
        let mut frame = Self {
            edges: Vec::with_capacity(sim.edges().len()),
            markers: Vec::with_capacity(nodes.len()),
            labels: Vec::with_capacity(nodes.len()),
        };

        let edge_stroke = Stroke::new(EDGE_WIDTH * scale, EDGE_COLOR);
        for edge in sim.edges() {
            if edge.source == edge.target {
                continue;
            }
            let (Some(source), Some(target)) = (nodes.get(edge.source), nodes.get(edge.target))
            else {
                continue;
            };

            let from = viewport.to_screen(source.pos);
            let to = viewport.to_screen(target.pos);
            let arrow = if directed {
                let reach = (kind_style(target.kind).radius + ARROW_GAP) * scale;
                arrow_head(from, to, reach, scale)
            } else {
                None
            };

            frame.edges.push(EdgeLine {
                from,
                to,
                stroke: edge_stroke,
                arrow,
            });
        }

        for (index, node) in nodes.iter().enumerate() {
            let style = kind_style(node.kind);
            let center = viewport.to_screen(node.pos);
            let is_hovered = hovered == Some(index);
            let fill = if is_hovered {
                blend_color(style.fill, Color32::WHITE, 0.3)
            } else {
                style.fill
            };
            let outline_color = if is_hovered {
                Color32::from_rgb(0x33, 0x33, 0x33)
            } else {
                Color32::WHITE
            };

            frame.markers.push(NodeMarker {
                center,
                radius: style.radius * scale,
                fill,
                outline: Stroke::new(OUTLINE_WIDTH * scale, outline_color),
            });
            frame.labels.push(NodeLabel {
                anchor: center + LABEL_OFFSET * scale,
                text: node.label.clone(),
                size: style.label_size * scale,
                color: LABEL_COLOR,
            });
        }

        frame
    }

    pub(in crate::app) fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.markers.is_empty() && self.labels.is_empty()
    }

    /// Edges first, then markers, then labels on top.
    pub(in crate::app) fn paint(&self, surface: &mut impl Surface) {
        for edge in &self.edges {
            surface.line(edge.from, edge.to, edge.stroke);
            if let Some(arrow) = &edge.arrow {
                surface.polygon(arrow, edge.stroke.color);
            }
        }
        for marker in &self.markers {
            surface.circle(marker.center, marker.radius, marker.fill, marker.outline);
        }
        for label in &self.labels {
            surface.text(label.anchor, &label.text, label.size, label.color);
        }
    }
}

/// Triangle whose tip sits `reach` short of `to` along the edge.
fn arrow_head(from: Pos2, to: Pos2, reach: f32, scale: f32) -> Option<[Pos2; 3]> {
    let delta = to - from;
    let length = delta.length();
    if !length.is_finite() || length <= reach + ARROW_LENGTH * scale {
        return None;
    }

    let direction = delta / length;
    let normal = vec2(-direction.y, direction.x);
    let tip = to - direction * reach;
    let base = tip - direction * (ARROW_LENGTH * scale);
    let half_width = normal * (ARROW_HALF_WIDTH * scale);
    Some([tip, base + half_width, base - half_width])
}

/// Paints a [`Frame`] through an egui painter offset to the canvas origin.
pub(in crate::app) struct PainterSurface<'a> {
    painter: &'a Painter,
    origin: Vec2,
}

impl<'a> PainterSurface<'a> {
    pub(in crate::app) fn new(painter: &'a Painter, origin: Pos2) -> Self {
        Self {
            painter,
            origin: origin.to_vec2(),
        }
    }
}

impl Surface for PainterSurface<'_> {
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter
            .line_segment([from + self.origin, to + self.origin], stroke);
    }

    fn polygon(&mut self, points: &[Pos2], fill: Color32) {
        let points = points.iter().map(|point| *point + self.origin).collect();
        self.painter
            .add(Shape::convex_polygon(points, fill, Stroke::NONE));
    }

    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, outline: Stroke) {
        self.painter
            .circle(center + self.origin, radius, fill, outline);
    }

    fn text(&mut self, anchor: Pos2, text: &str, size: f32, color: Color32) {
        self.painter.text(
            anchor + self.origin,
            Align2::LEFT_BOTTOM,
            text,
            FontId::proportional(size.max(1.0)),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::graph::{AdaptedGraph, GraphEdge, GraphNode, NodeKind};
    use crate::app::physics::SimulationParams;
    use crate::config::{ViewKind, ViewProfile};

    #[derive(Default)]
    struct CountingSurface {
        lines: usize,
        polygons: usize,
        circles: usize,
        texts: Vec<String>,
    }

    impl CountingSurface {
        fn calls(&self) -> usize {
            self.lines + self.polygons + self.circles + self.texts.len()
        }
    }

    impl Surface for CountingSurface {
        fn line(&mut self, _from: Pos2, _to: Pos2, _stroke: Stroke) {
            self.lines += 1;
        }

        fn polygon(&mut self, _points: &[Pos2], _fill: Color32) {
            self.polygons += 1;
        }

        fn circle(&mut self, _center: Pos2, _radius: f32, _fill: Color32, _outline: Stroke) {
            self.circles += 1;
        }

        fn text(&mut self, _anchor: Pos2, text: &str, _size: f32, _color: Color32) {
            self.texts.push(text.to_owned());
        }
    }

    fn simulation(kind: ViewKind, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Simulation {
        let profile = ViewProfile::for_kind(kind);
        let graph = AdaptedGraph {
            nodes,
            edges,
            directed: profile.directed,
        };
        Simulation::new(graph, SimulationParams::from_profile(&profile))
    }

    #[test]
    fn empty_function_graph_draws_nothing() {
        let sim = simulation(ViewKind::Function, Vec::new(), Vec::new());
        let frame = Frame::build(&sim, &Viewport::default(), true, None);
        let mut surface = CountingSurface::default();

        frame.paint(&mut surface);

        assert!(frame.is_empty());
        assert_eq!(surface.calls(), 0);
    }

    #[test]
    fn directed_edges_get_arrowheads() {
        let nodes = vec![
            GraphNode::new("caller", "caller", NodeKind::Function),
            GraphNode::new("callee", "callee", NodeKind::Function),
            GraphNode::new("loop", "loop", NodeKind::Function),
        ];
        let edges = vec![
            GraphEdge { source: 0, target: 1 },
            GraphEdge { source: 2, target: 2 },
        ];
        let mut sim = simulation(ViewKind::Function, nodes, edges);
        for _ in 0..60 {
            sim.advance();
        }
        let frame = Frame::build(&sim, &Viewport::default(), true, None);
        let mut surface = CountingSurface::default();

        frame.paint(&mut surface);

        assert_eq!(surface.lines, 1);
        assert_eq!(surface.polygons, 1);
        assert_eq!(surface.circles, 3);
        assert_eq!(surface.texts, vec!["caller", "callee", "loop"]);

        let tip = frame.edges[0].arrow.unwrap()[0];
        let target = frame.markers[1].center;
        assert!((tip.distance(target) - 12.0).abs() < 1.0e-3);
    }

    #[test]
    fn markers_and_labels_follow_viewport() {
        let nodes = vec![GraphNode::new("src/core.js", "src/core.js", NodeKind::Target)];
        let sim = simulation(ViewKind::BlastRadius, nodes, Vec::new());
        let viewport = Viewport {
            scale: 2.0,
            translate: vec2(-100.0, 50.0),
        };

        let frame = Frame::build(&sim, &viewport, false, None);

        let expected = viewport.to_screen(sim.nodes()[0].pos);
        assert_eq!(frame.markers[0].center, expected);
        assert_eq!(frame.markers[0].radius, 24.0);
        assert_eq!(frame.markers[0].fill, Color32::from_rgb(0xff, 0x44, 0x44));
        assert_eq!(frame.labels[0].anchor, expected + vec2(24.0, 8.0));
        assert!(frame.edges.is_empty());
    }

    #[test]
    fn undirected_edges_have_no_arrowheads() {
        let nodes = vec![
            GraphNode::new("a", "a", NodeKind::File),
            GraphNode::new("b", "b", NodeKind::File),
        ];
        let sim = simulation(ViewKind::File, nodes, vec![GraphEdge { source: 0, target: 1 }]);
        let frame = Frame::build(&sim, &Viewport::default(), false, Some(1));

        assert!(frame.edges[0].arrow.is_none());
        assert_ne!(frame.markers[1].fill, frame.markers[0].fill);
    }
}
