use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, StrokeKind};

use super::graph::NodeKind;
use super::viewport::Viewport;

// #999 at 60% opacity.
pub(super) const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(92, 92, 92, 153);
pub(super) const EDGE_WIDTH: f32 = 2.0;
pub(super) const OUTLINE_WIDTH: f32 = 2.0;
pub(super) const LABEL_COLOR: Color32 = Color32::from_rgb(51, 51, 51);

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct NodeStyle {
    pub(super) radius: f32,
    pub(super) fill: Color32,
    pub(super) label_size: f32,
}

pub(super) fn kind_style(kind: NodeKind) -> NodeStyle {
    match kind {
        NodeKind::File => NodeStyle {
            radius: 8.0,
            fill: Color32::from_rgb(0x66, 0x7e, 0xea),
            label_size: 10.0,
        },
        NodeKind::Function => NodeStyle {
            radius: 10.0,
            fill: Color32::from_rgb(0xf5, 0x9e, 0x0b),
            label_size: 11.0,
        },
        NodeKind::Target => NodeStyle {
            radius: 12.0,
            fill: Color32::from_rgb(0xff, 0x44, 0x44),
            label_size: 10.0,
        },
        NodeKind::DirectDependent => NodeStyle {
            radius: 8.0,
            fill: Color32::from_rgb(0xff, 0x88, 0x44),
            label_size: 10.0,
        },
        NodeKind::IndirectDependent => NodeStyle {
            radius: 8.0,
            fill: Color32::from_rgb(0xff, 0xbb, 0x44),
            label_size: 10.0,
        },
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Light canvas with a grid that follows the viewport.
pub(super) fn draw_background(painter: &Painter, rect: Rect, viewport: &Viewport) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(0xfa, 0xfa, 0xfa));

    let step = (50.0 * viewport.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + viewport.translate;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(0, 0, 0, 12));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }

    painter.rect_stroke(
        rect,
        4.0,
        Stroke::new(1.0, Color32::from_rgb(0xdd, 0xdd, 0xdd)),
        StrokeKind::Inside,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_interpolates_channels() {
        let mixed = blend_color(Color32::from_rgb(0, 0, 0), Color32::from_rgb(200, 100, 50), 0.5);
        assert_eq!(mixed, Color32::from_rgb(100, 50, 25));
        assert_eq!(
            blend_color(Color32::WHITE, Color32::BLACK, 4.0),
            Color32::BLACK
        );
    }

    #[test]
    fn target_marker_is_largest() {
        let target = kind_style(NodeKind::Target).radius;
        for kind in [NodeKind::File, NodeKind::Function, NodeKind::DirectDependent] {
            assert!(kind_style(kind).radius < target);
        }
        assert!(kind_style(NodeKind::Function).label_size > kind_style(NodeKind::File).label_size);
    }
}
