use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::{ContentGraph, GraphEdge, GraphNode};
use crate::content::ContentItem;
use crate::threads::ThreadPair;

fn make_graph_node(item: &ContentItem) -> GraphNode {
    GraphNode {
        id: item.id.clone(),
        slug: item.slug.clone(),
        title: item.title.clone(),
        kind: item.kind,
        connection_count: 0,
        href: item.href(),
    }
}

/// Builds one node per item and one edge per thread whose endpoints both
/// exist. Threads pointing at unknown ids are dropped silently; that is the
/// normal outcome of upstream filtering.
pub fn assemble_graph(items: &[ContentItem], threads: &[ThreadPair]) -> ContentGraph {
    let mut nodes = Vec::with_capacity(items.len());
    let mut index_by_id = HashMap::with_capacity(items.len());
    for item in items {
        if index_by_id.contains_key(item.id.as_str()) {
            continue;
        }
        index_by_id.insert(item.id.as_str(), nodes.len());
        nodes.push(make_graph_node(item));
    }

    let mut edges = Vec::with_capacity(threads.len());
    let mut seen = HashSet::with_capacity(threads.len());
    let mut dropped = 0usize;
    for thread in threads {
        let (Some(&from), Some(&to)) = (
            index_by_id.get(thread.from_id.as_str()),
            index_by_id.get(thread.to_id.as_str()),
        ) else {
            dropped += 1;
            continue;
        };

        if from == to || !seen.insert((from.min(to), from.max(to))) {
            dropped += 1;
            continue;
        }

        nodes[from].connection_count += 1;
        nodes[to].connection_count += 1;
        edges.push(GraphEdge {
            source: thread.from_id.clone(),
            target: thread.to_id.clone(),
            kind: thread.kind,
            stroke_width: thread.weight.stroke_width(),
        });
    }

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        dropped,
        "assembled content graph"
    );
    ContentGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentType;
    use crate::threads::{ThreadConfig, score_pairs, select_threads};

    fn essay(slug: &str, tags: &[&str]) -> ContentItem {
        ContentItem::new(ContentType::Essay, slug, slug, tags.iter().copied(), None)
    }

    fn threads_for_items(items: &[ContentItem]) -> Vec<ThreadPair> {
        let candidates = score_pairs(items);
        select_threads(&candidates, &ThreadConfig::default()).unwrap()
    }

    #[test]
    fn connection_counts_follow_retained_edges() {
        let items = vec![
            essay("a", &["x", "y", "z"]),
            essay("b", &["x", "y", "z"]),
            essay("c", &["x"]),
            essay("d", &["q"]),
        ];
        let threads = threads_for_items(&items);
        let graph = assemble_graph(&items, &threads);

        let counts = graph
            .nodes
            .iter()
            .map(|node| (node.slug.as_str(), node.connection_count))
            .collect::<Vec<_>>();
        assert_eq!(counts, [("a", 2), ("b", 2), ("c", 2), ("d", 0)]);
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.edges[0].stroke_width, 1.5);
        assert_eq!(graph.edges[1].stroke_width, 0.5);
        assert_eq!(graph.orphans().count(), 1);
        assert_eq!(graph.max_connection_count(), 2);
    }

    #[test]
    fn dangling_threads_are_dropped() {
        let all = vec![essay("a", &["x"]), essay("b", &["x"])];
        let threads = threads_for_items(&all);
        assert_eq!(threads.len(), 1);

        let visible = vec![all[0].clone()];
        let graph = assemble_graph(&visible, &threads);

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        assert_eq!(graph.nodes[0].connection_count, 0);
    }

    #[test]
    fn repeated_threads_produce_one_edge() {
        let items = vec![essay("a", &["x"]), essay("b", &["x"])];
        let mut threads = threads_for_items(&items);
        let mut reversed = threads[0].clone();
        std::mem::swap(&mut reversed.from_id, &mut reversed.to_id);
        threads.push(reversed);

        let graph = assemble_graph(&items, &threads);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.nodes[0].connection_count, 1);
    }

    #[test]
    fn nodes_carry_site_links() {
        let items = vec![ContentItem::new(
            ContentType::FieldNote,
            "walks",
            "Walks",
            ["x"],
            None,
        )];
        let graph = assemble_graph(&items, &[]);

        assert_eq!(graph.nodes[0].href, "/field-notes/walks");
        assert_eq!(graph.edge_indices(), Vec::<(usize, usize)>::new());
        assert_eq!(
            graph.node("field-note-walks").map(|node| node.title.as_str()),
            Some("Walks")
        );
        assert!(graph.node("essay-walks").is_none());
    }
}
