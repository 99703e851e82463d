use eframe::egui::{Vec2, vec2};

use super::super::graph::{GraphEdge, GraphNode};

const DISTANCE_MIN_SQ: f32 = 1.0;
const NUDGE_LENGTH: f32 = 1.0e-3;

#[derive(Clone, Copy)]
pub(super) struct LinkTerm {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

/// Deterministic tiny offset for coincident pairs.
fn nudge(first: usize, second: usize) -> Vec2 {
    let angle = ((first as f32) * 0.618_034 + (second as f32) * 0.414_214 + 0.11)
        * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin()) * NUDGE_LENGTH
}

pub(super) fn link_terms(node_count: usize, edges: &[GraphEdge]) -> Vec<LinkTerm> {
    let mut degree = vec![0usize; node_count];
    for edge in edges {
        if edge.source == edge.target || edge.source >= node_count || edge.target >= node_count {
            continue;
        }
        degree[edge.source] += 1;
        degree[edge.target] += 1;
    }

    edges
        .iter()
        .filter(|edge| {
            edge.source != edge.target && edge.source < node_count && edge.target < node_count
        })
        .map(|edge| {
            let source_degree = degree[edge.source] as f32;
            let target_degree = degree[edge.target] as f32;
            LinkTerm {
                source: edge.source,
                target: edge.target,
                strength: 1.0 / source_degree.min(target_degree),
                bias: source_degree / (source_degree + target_degree),
            }
        })
        .collect()
}

pub(super) fn apply_links(nodes: &mut [GraphNode], links: &[LinkTerm], distance: f32, alpha: f32) {
    for link in links {
        let source = &nodes[link.source];
        let target = &nodes[link.target];
        let mut delta = (target.pos + target.velocity) - (source.pos + source.velocity);
        if delta.length_sq() <= f32::EPSILON {
            delta = nudge(link.source, link.target);
        }

        let length = delta.length();
        let correction = delta * ((length - distance) / length * alpha * link.strength);

        nodes[link.target].velocity -= correction * link.bias;
        nodes[link.source].velocity += correction * (1.0 - link.bias);
    }
}

/// Pairwise inverse-square repulsion; `strength` is negative for repulsion.
pub(super) fn apply_charge(nodes: &mut [GraphNode], strength: f32, alpha: f32) {
    let node_count = nodes.len();
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let mut delta = nodes[j].pos - nodes[i].pos;
            let mut distance_sq = delta.length_sq();
            if distance_sq <= f32::EPSILON {
                delta = nudge(i, j);
                distance_sq = delta.length_sq();
            }
            if distance_sq < DISTANCE_MIN_SQ {
                distance_sq = (DISTANCE_MIN_SQ * distance_sq).sqrt();
            }

            let push = delta * (strength * alpha / distance_sq);
            nodes[i].velocity += push;
            nodes[j].velocity -= push;
        }
    }
}

/// Moves every node so the centroid approaches `center`.
pub(super) fn apply_centering(nodes: &mut [GraphNode], center: Vec2, strength: f32) {
    if nodes.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes.iter() {
        centroid += node.pos;
    }
    centroid /= nodes.len() as f32;

    let shift = (center - centroid) * strength;
    if shift.length_sq() <= 0.000_001 {
        return;
    }
    for node in nodes.iter_mut() {
        node.pos += shift;
    }
}

/// Minimum separation of `2 * radius` between every pair, using the
/// positions the nodes are about to move to.
pub(super) fn apply_collision(nodes: &mut [GraphNode], radius: f32, strength: f32) {
    if radius <= 0.0 {
        return;
    }

    let min_distance = radius * 2.0;
    let min_distance_sq = min_distance * min_distance;
    let node_count = nodes.len();
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let mut delta = (nodes[i].pos + nodes[i].velocity) - (nodes[j].pos + nodes[j].velocity);
            let mut distance_sq = delta.length_sq();
            if distance_sq >= min_distance_sq {
                continue;
            }
            if distance_sq <= f32::EPSILON {
                delta = nudge(i, j);
                distance_sq = delta.length_sq();
            }

            let distance = distance_sq.sqrt();
            let overlap = (min_distance - distance) / distance * strength;
            let push = delta * (overlap * 0.5);
            nodes[i].velocity += push;
            nodes[j].velocity -= push;
        }
    }
}
