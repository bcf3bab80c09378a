use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GraphConfig;
use crate::content::{ContentItem, ContentSources, normalize_corpus};
use crate::error::Result;
use crate::graph::{ContentGraph, assemble_graph};
use crate::layout::{LayoutNode, compute_layout};
use crate::threads::{ThreadPair, score_pairs, select_threads, threads_for};

/// Output of one pipeline run, ready to hand to a renderer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadGraph {
    pub threads: Vec<ThreadPair>,
    pub graph: ContentGraph,
    pub layout: Vec<LayoutNode>,
}

impl ThreadGraph {
    pub fn threads_for(&self, id: &str) -> Vec<&ThreadPair> {
        threads_for(&self.threads, id)
    }

    pub fn position(&self, id: &str) -> Option<&LayoutNode> {
        self.layout.iter().find(|node| node.id == id)
    }
}

/// Holds the validated configuration every stage reads. Build one per
/// configuration and reuse it; it carries no state between runs.
#[derive(Clone, Debug)]
pub struct ThreadGraphContext {
    config: GraphConfig,
}

impl ThreadGraphContext {
    pub fn new(config: GraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Scores, selects, assembles and lays out the given items.
    pub fn build(&self, items: &[ContentItem]) -> Result<ThreadGraph> {
        let candidates = score_pairs(items);
        let threads = select_threads(&candidates, &self.config.threads)?;
        let graph = assemble_graph(items, &threads);
        let layout = compute_layout(&graph, &self.config.layout)?;

        info!(
            items = items.len(),
            candidates = candidates.len(),
            threads = threads.len(),
            orphans = graph.orphans().count(),
            "built thread graph"
        );

        Ok(ThreadGraph {
            threads,
            graph,
            layout,
        })
    }

    /// Normalizes raw collections first, then runs [`Self::build`].
    pub fn build_from_sources(&self, sources: &ContentSources) -> Result<ThreadGraph> {
        let items = normalize_corpus(sources);
        self.build(&items)
    }
}
