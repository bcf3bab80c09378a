use std::collections::HashSet;

use super::ContentGraph;

pub const EDGE_ALPHA_IDLE: f32 = 0.3;
pub const EDGE_ALPHA_CONNECTED: f32 = 0.6;
pub const EDGE_ALPHA_DIMMED: f32 = 0.06;
pub const NODE_OPACITY_DIMMED: f32 = 0.12;

/// The hovered node, its direct neighbours, and the edges among them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightState {
    pub hovered: usize,
    pub related_nodes: HashSet<usize>,
    pub related_edges: HashSet<usize>,
}

impl HighlightState {
    pub fn node_opacity(&self, index: usize) -> f32 {
        if self.related_nodes.contains(&index) {
            1.0
        } else {
            NODE_OPACITY_DIMMED
        }
    }

    pub fn edge_alpha(&self, edge_index: usize) -> f32 {
        if self.related_edges.contains(&edge_index) {
            EDGE_ALPHA_CONNECTED
        } else {
            EDGE_ALPHA_DIMMED
        }
    }
}

/// Edge alpha for the current hover, or the idle alpha when nothing is hovered.
pub fn edge_alpha(state: Option<&HighlightState>, edge_index: usize) -> f32 {
    state.map_or(EDGE_ALPHA_IDLE, |state| state.edge_alpha(edge_index))
}

pub fn highlight(graph: &ContentGraph, hovered_id: &str) -> Option<HighlightState> {
    let index_by_id = graph.index_by_id();
    let hovered = *index_by_id.get(hovered_id)?;

    let mut related_nodes = HashSet::from([hovered]);
    for edge in &graph.edges {
        let neighbour = if edge.source == hovered_id {
            &edge.target
        } else if edge.target == hovered_id {
            &edge.source
        } else {
            continue;
        };

        if let Some(&index) = index_by_id.get(neighbour.as_str()) {
            related_nodes.insert(index);
        }
    }

    // Edges between two neighbours count as connected too.
    let related_edges = graph
        .edges
        .iter()
        .enumerate()
        .filter(|(_, edge)| {
            let source = index_by_id.get(edge.source.as_str());
            let target = index_by_id.get(edge.target.as_str());
            matches!(
                (source, target),
                (Some(source), Some(target))
                    if related_nodes.contains(source) && related_nodes.contains(target)
            )
        })
        .map(|(index, _)| index)
        .collect();

    Some(HighlightState {
        hovered,
        related_nodes,
        related_edges,
    })
}
