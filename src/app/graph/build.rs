use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::api::{BlastRadiusData, GraphData, GraphPayload};
use crate::util::file_label;

use super::{GraphEdge, GraphNode, NodeKind};

pub(in crate::app) const INDIRECT_DEPENDENT_LIMIT: usize = 10;

pub(in crate::app) struct AdaptedGraph {
    pub(in crate::app) nodes: Vec<GraphNode>,
    pub(in crate::app) edges: Vec<GraphEdge>,
    pub(in crate::app) directed: bool,
}

impl AdaptedGraph {
    pub(in crate::app) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

struct GraphBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index_by_id: HashMap<String, usize>,
    dropped_edges: usize,
    duplicate_nodes: usize,
}

impl GraphBuilder {
    fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            index_by_id: HashMap::with_capacity(nodes),
            dropped_edges: 0,
            duplicate_nodes: 0,
        }
    }

    fn add_node(&mut self, node: GraphNode) -> usize {
        match self.index_by_id.entry(node.id.clone()) {
            Entry::Occupied(entry) => {
                self.duplicate_nodes += 1;
                *entry.get()
            }
            Entry::Vacant(entry) => {
                let index = self.nodes.len();
                entry.insert(index);
                self.nodes.push(node);
                index
            }
        }
    }

    fn add_edge(&mut self, source: &str, target: &str) {
        match (self.index_by_id.get(source), self.index_by_id.get(target)) {
            (Some(&source), Some(&target)) if source != target => {
                self.edges.push(GraphEdge { source, target });
            }
            _ => self.dropped_edges += 1,
        }
    }

    fn finish(self, view: &str, directed: bool) -> AdaptedGraph {
        if self.dropped_edges > 0 || self.duplicate_nodes > 0 {
            debug!(
                view,
                dropped_edges = self.dropped_edges,
                duplicate_nodes = self.duplicate_nodes,
                "normalized graph payload"
            );
        }

        AdaptedGraph {
            nodes: self.nodes,
            edges: self.edges,
            directed,
        }
    }
}

pub(in crate::app) fn adapt_payload(payload: &GraphPayload) -> AdaptedGraph {
    match payload {
        GraphPayload::FileGraph(data) => adapt_file_graph(data),
        GraphPayload::FunctionGraph(data) => adapt_function_graph(data),
        GraphPayload::BlastRadius(data) => adapt_blast_radius(data),
    }
}

fn adapt_file_graph(data: &GraphData) -> AdaptedGraph {
    let mut builder = GraphBuilder::with_capacity(data.nodes.len(), data.edges.len());
    for raw in &data.nodes {
        let label = raw.label.clone().unwrap_or_else(|| raw.id.clone());
        builder.add_node(GraphNode::new(raw.id.clone(), label, NodeKind::File));
    }
    for edge in &data.edges {
        builder.add_edge(&edge.source, &edge.target);
    }
    builder.finish("file", false)
}

fn adapt_function_graph(data: &GraphData) -> AdaptedGraph {
    let mut builder = GraphBuilder::with_capacity(data.nodes.len(), data.edges.len());
    for raw in &data.nodes {
        let kind = match raw.node_type.as_deref() {
            Some("function") => NodeKind::Function,
            _ => NodeKind::File,
        };
        let label = raw.label.clone().unwrap_or_else(|| raw.id.clone());
        let mut node = GraphNode::new(raw.id.clone(), label, kind);
        node.file = raw.file.clone();
        node.line = raw.line;
        builder.add_node(node);
    }
    for edge in &data.edges {
        builder.add_edge(&edge.source, &edge.target);
    }
    builder.finish("function", true)
}

/// Synthesizes a star around the changed file: direct dependents point at the
/// target, indirect dependents all point at the first direct dependent.
fn adapt_blast_radius(data: &BlastRadiusData) -> AdaptedGraph {
    let indirect = &data.indirect_dependents[..data
        .indirect_dependents
        .len()
        .min(INDIRECT_DEPENDENT_LIMIT)];
    let mut builder =
        GraphBuilder::with_capacity(1 + data.direct_dependents.len() + indirect.len(), 0);

    builder.add_node(GraphNode::new(
        data.file.clone(),
        file_label(&data.file),
        NodeKind::Target,
    ));
    for path in &data.direct_dependents {
        builder.add_node(GraphNode::new(
            path.clone(),
            file_label(path),
            NodeKind::DirectDependent,
        ));
    }
    for path in indirect {
        builder.add_node(GraphNode::new(
            path.clone(),
            file_label(path),
            NodeKind::IndirectDependent,
        ));
    }

    for path in &data.direct_dependents {
        if path != &data.file {
            builder.add_edge(path, &data.file);
        }
    }
    let hub = data.direct_dependents.first().unwrap_or(&data.file);
    for path in indirect {
        if path != hub {
            builder.add_edge(path, hub);
        }
    }

    builder.finish("blast-radius", false)
}
