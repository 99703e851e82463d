mod build;
mod interaction;
mod view;

use eframe::egui::Vec2;

pub(in crate::app) use build::{AdaptedGraph, adapt_payload};
pub(in crate::app) use interaction::DragController;
pub(in crate::app) use view::GraphView;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(in crate::app) enum NodeKind {
    File,
    Function,
    Target,
    DirectDependent,
    IndirectDependent,
}

impl NodeKind {
    pub(in crate::app) fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Function => "function",
            Self::Target => "target",
            Self::DirectDependent => "direct dependent",
            Self::IndirectDependent => "indirect dependent",
        }
    }
}

#[derive(Clone, Debug)]
pub(in crate::app) struct GraphNode {
    pub(in crate::app) id: String,
    pub(in crate::app) label: String,
    pub(in crate::app) kind: NodeKind,
    pub(in crate::app) file: Option<String>,
    pub(in crate::app) line: Option<u32>,
    pub(in crate::app) pos: Vec2,
    pub(in crate::app) velocity: Vec2,
    pub(in crate::app) pin: Option<Vec2>,
}

impl GraphNode {
    pub(in crate::app) fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: NodeKind,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            file: None,
            line: None,
            pos: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }
}

/// Edge between two node indices of the same graph instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct GraphEdge {
    pub(in crate::app) source: usize,
    pub(in crate::app) target: usize,
}
