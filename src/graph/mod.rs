mod build;
mod highlight;
mod search;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::content::ContentType;

pub use build::assemble_graph;
pub use highlight::{
    EDGE_ALPHA_CONNECTED, EDGE_ALPHA_DIMMED, EDGE_ALPHA_IDLE, HighlightState, NODE_OPACITY_DIMMED,
    edge_alpha, highlight,
};
pub use search::search_nodes;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub connection_count: usize,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub stroke_width: f32,
}

/// Renderer-facing node and edge lists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl ContentGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn index_by_id(&self) -> HashMap<&str, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.as_str(), index))
            .collect()
    }

    /// Edges as index pairs into `nodes`, for the layout engine.
    pub fn edge_indices(&self) -> Vec<(usize, usize)> {
        let index_by_id = self.index_by_id();
        self.edges
            .iter()
            .filter_map(|edge| {
                Some((
                    *index_by_id.get(edge.source.as_str())?,
                    *index_by_id.get(edge.target.as_str())?,
                ))
            })
            .collect()
    }

    pub fn orphans(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|node| node.connection_count == 0)
    }

    pub fn max_connection_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| node.connection_count)
            .max()
            .unwrap_or(0)
    }
}
