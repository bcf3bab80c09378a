use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::{ContentGraph, GraphNode};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Nodes whose title or slug fuzzily matches `query`, best match first.
pub fn search_nodes<'a>(graph: &'a ContentGraph, query: &str, limit: usize) -> Vec<&'a GraphNode> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut ranked = graph
        .nodes
        .iter()
        .filter_map(|node| {
            let score = fuzzy_match_score(&matcher, &node.title, query)
                .into_iter()
                .chain(fuzzy_match_score(&matcher, &node.slug, query))
                .max()?;
            Some((score, node))
        })
        .collect::<Vec<_>>();

    ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
    ranked.truncate(limit);
    ranked.into_iter().map(|(_, node)| node).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentItem, ContentType};
    use crate::graph::assemble_graph;

    fn graph() -> ContentGraph {
        let items = vec![
            ContentItem::new(ContentType::Essay, "parking-minimums", "Parking Minimums", ["x"], None),
            ContentItem::new(ContentType::FieldNote, "bus-stop", "The Bus Stop", ["x"], None),
            ContentItem::new(ContentType::Shelf, "power-broker", "The Power Broker", ["x"], None),
        ];
        assemble_graph(&items, &[])
    }

    #[test]
    fn search_matches_titles_case_insensitively() {
        let graph = graph();
        let hits = search_nodes(&graph, "PARKING", 10);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "essay-parking-minimums");
    }

    #[test]
    fn search_matches_slugs() {
        let graph = graph();
        let hits = search_nodes(&graph, "bus-stop", 10);

        assert_eq!(hits[0].id, "field-note-bus-stop");
    }

    #[test]
    fn blank_queries_and_zero_limits_return_nothing() {
        let graph = graph();
        assert!(search_nodes(&graph, "   ", 10).is_empty());
        assert!(search_nodes(&graph, "the", 0).is_empty());
    }

    #[test]
    fn limit_truncates_results() {
        let graph = graph();
        assert_eq!(search_nodes(&graph, "the", 1).len(), 1);
    }
}
