mod forces;

use std::collections::HashMap;

use eframe::egui::{Pos2, Rect, Vec2, vec2};
use tracing::debug;

use crate::config::ViewProfile;

use super::graph::{AdaptedGraph, GraphEdge, GraphNode};
use forces::{LinkTerm, apply_centering, apply_charge, apply_collision, apply_links, link_terms};

pub(in crate::app) const DRAG_ALPHA_TARGET: f32 = 0.3;

const INITIAL_RADIUS: f32 = 10.0;
const INITIAL_ANGLE: f32 = 2.399_963;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct SimulationParams {
    pub(in crate::app) center: Vec2,
    pub(in crate::app) link_distance: f32,
    pub(in crate::app) charge_strength: f32,
    pub(in crate::app) collide_radius: f32,
    pub(in crate::app) collide_strength: f32,
    pub(in crate::app) center_strength: f32,
    pub(in crate::app) alpha_min: f32,
    pub(in crate::app) alpha_decay: f32,
    pub(in crate::app) velocity_decay: f32,
}

impl SimulationParams {
    pub(in crate::app) fn from_profile(profile: &ViewProfile) -> Self {
        let alpha_min = 0.001_f32;
        Self {
            center: profile.canvas_size * 0.5,
            link_distance: profile.link_distance,
            charge_strength: profile.charge_strength,
            collide_radius: profile.collide_radius,
            collide_strength: 1.0,
            center_strength: 0.1,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
        }
    }
}

/// Force-directed layout that advances one step per call.
///
/// Owns the node and edge arrays of exactly one graph. Pinned nodes are held
/// at their pin and never integrate forces.
pub(in crate::app) struct Simulation {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    links: Vec<LinkTerm>,
    index_by_id: HashMap<String, usize>,
    params: SimulationParams,
    alpha: f32,
    alpha_target: f32,
    running: bool,
}

impl Simulation {
    pub(in crate::app) fn new(graph: AdaptedGraph, params: SimulationParams) -> Self {
        let AdaptedGraph {
            mut nodes, edges, ..
        } = graph;

        for (index, node) in nodes.iter_mut().enumerate() {
            let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
            let angle = index as f32 * INITIAL_ANGLE;
            node.pos = params.center + vec2(angle.cos(), angle.sin()) * radius;
            node.velocity = Vec2::ZERO;
            node.pin = None;
        }

        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();
        let links = link_terms(nodes.len(), &edges);

        Self {
            nodes,
            edges,
            links,
            index_by_id,
            params,
            alpha: 1.0,
            alpha_target: 0.0,
            running: true,
        }
    }

    pub(in crate::app) fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub(in crate::app) fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub(in crate::app) fn node(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    pub(in crate::app) fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub(in crate::app) fn is_active(&self) -> bool {
        self.running
    }

    pub(in crate::app) fn set_alpha_target(&mut self, alpha_target: f32) {
        self.alpha_target = alpha_target.clamp(0.0, 1.0);
    }

    pub(in crate::app) fn restart(&mut self) {
        if !self.running {
            debug!(alpha = self.alpha, "layout reheated");
        }
        self.running = true;
    }

    /// Runs one step. Returns whether the layout is still moving.
    pub(in crate::app) fn advance(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

        if !self.nodes.is_empty() {
            let alpha = self.alpha;
            apply_links(
                &mut self.nodes,
                &self.links,
                self.params.link_distance,
                alpha,
            );
            apply_charge(&mut self.nodes, self.params.charge_strength, alpha);
            apply_centering(
                &mut self.nodes,
                self.params.center,
                self.params.center_strength,
            );
            apply_collision(
                &mut self.nodes,
                self.params.collide_radius,
                self.params.collide_strength,
            );
            self.integrate();
        }

        if self.alpha < self.params.alpha_min {
            self.running = false;
            debug!(nodes = self.nodes.len(), "layout settled");
        }
        self.running
    }

    fn integrate(&mut self) {
        let damping = 1.0 - self.params.velocity_decay;
        for node in &mut self.nodes {
            if let Some(pin) = node.pin {
                node.pos = pin;
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity *= damping;
            node.pos += node.velocity;

            if !node.pos.is_finite() || !node.velocity.is_finite() {
                node.pos = self.params.center;
                node.velocity = Vec2::ZERO;
            }
        }
    }

    pub(in crate::app) fn pin(&mut self, id: &str, x: f32, y: f32) -> bool {
        match self.index_of(id) {
            Some(index) => self.pin_index(index, vec2(x, y)),
            None => false,
        }
    }

    pub(in crate::app) fn unpin(&mut self, id: &str) -> bool {
        match self.index_of(id) {
            Some(index) => self.unpin_index(index),
            None => false,
        }
    }

    fn pin_index(&mut self, index: usize, pos: Vec2) -> bool {
        if !pos.is_finite() {
            return false;
        }
        let Some(node) = self.nodes.get_mut(index) else {
            return false;
        };
        node.pin = Some(pos);
        node.pos = pos;
        node.velocity = Vec2::ZERO;
        true
    }

    fn unpin_index(&mut self, index: usize) -> bool {
        let Some(node) = self.nodes.get_mut(index) else {
            return false;
        };
        node.pin.take().is_some()
    }

    pub(in crate::app) fn bounds(&self) -> Option<Rect> {
        let first = self.nodes.first()?;
        let mut min = first.pos;
        let mut max = first.pos;
        for node in &self.nodes[1..] {
            min = min.min(node.pos);
            max = max.max(node.pos);
        }
        Some(Rect::from_min_max(Pos2::ZERO + min, Pos2::ZERO + max))
    }
}
