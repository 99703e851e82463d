use std::time::Duration;

use clap::ValueEnum;
use eframe::egui::{Vec2, vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum ViewKind {
    File,
    Function,
    BlastRadius,
}

impl ViewKind {
    pub const ALL: [Self; 3] = [Self::File, Self::Function, Self::BlastRadius];

    pub fn title(self) -> &'static str {
        match self {
            Self::File => "Dependency Graph",
            Self::Function => "Function Call Graph",
            Self::BlastRadius => "Blast Radius",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ChangeType {
    #[default]
    Modify,
    Delete,
    Move,
}

impl ChangeType {
    pub const ALL: [Self; 3] = [Self::Modify, Self::Delete, Self::Move];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modify => "modify",
            Self::Delete => "delete",
            Self::Move => "move",
        }
    }
}

/// Fixed layout and canvas constants for one graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewProfile {
    pub canvas_size: Vec2,
    pub link_distance: f32,
    pub charge_strength: f32,
    pub collide_radius: f32,
    pub directed: bool,
}

impl ViewProfile {
    pub fn for_kind(kind: ViewKind) -> Self {
        match kind {
            ViewKind::File => Self {
                canvas_size: vec2(800.0, 600.0),
                link_distance: 100.0,
                charge_strength: -300.0,
                collide_radius: 40.0,
                directed: false,
            },
            ViewKind::Function => Self {
                canvas_size: vec2(800.0, 600.0),
                link_distance: 150.0,
                charge_strength: -400.0,
                collide_radius: 50.0,
                directed: true,
            },
            ViewKind::BlastRadius => Self {
                canvas_size: vec2(800.0, 400.0),
                link_distance: 100.0,
                charge_strength: -300.0,
                collide_radius: 40.0,
                directed: false,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base: String,
    pub request_timeout: Duration,
    pub initial_view: ViewKind,
    pub initial_function: Option<String>,
    pub initial_file: Option<String>,
    pub change_type: ChangeType,
}
