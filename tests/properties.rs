use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use paper_trail::content::{ContentItem, ContentType};
use paper_trail::graph::assemble_graph;
use paper_trail::layout::{LayoutConfig, compute_layout};
use paper_trail::threads::{ThreadConfig, score_pair, score_pairs, select_threads};

const TAGS: [&str; 6] = ["maps", "cities", "walking", "tools", "rivers", "archives"];

fn build_item(index: usize, kind: usize, tags: &[usize], offset: Option<u64>) -> ContentItem {
    let date = offset.and_then(|days| {
        NaiveDate::from_ymd_opt(2023, 1, 1).and_then(|base| base.checked_add_days(Days::new(days)))
    });
    ContentItem::new(
        ContentType::ALL[kind],
        format!("item-{index}"),
        format!("Item {index}"),
        tags.iter().map(|&tag| TAGS[tag]),
        date,
    )
}

fn corpus(max_len: usize) -> impl Strategy<Value = Vec<ContentItem>> {
    prop::collection::vec(
        (
            0..ContentType::ALL.len(),
            prop::collection::vec(0..TAGS.len(), 0..4),
            prop::option::of(0u64..900),
        ),
        0..max_len,
    )
    .prop_map(|specs| {
        specs
            .iter()
            .enumerate()
            .map(|(index, (kind, tags, offset))| build_item(index, *kind, tags, *offset))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn scoring_ignores_argument_order(items in corpus(10)) {
        for first in &items {
            for second in &items {
                let forward = score_pair(first, second);
                let backward = score_pair(second, first);
                match (forward, backward) {
                    (Some(f), Some(b)) => {
                        prop_assert_eq!(&f.a.id, &b.a.id);
                        prop_assert_eq!(&f.b.id, &b.b.id);
                        prop_assert_eq!(f.score, b.score);
                        prop_assert_eq!(f.weight, b.weight);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "asymmetric scoring for {} / {}", first.id, second.id),
                }
            }
        }
    }

    #[test]
    fn candidates_are_ordered_and_written(items in corpus(14)) {
        for pair in score_pairs(&items) {
            prop_assert!(pair.a.id < pair.b.id);
            prop_assert!(pair.a.kind.is_written() || pair.b.kind.is_written());
            prop_assert!(pair.shared_tag_count >= 1);
        }
    }

    #[test]
    fn weight_never_falls_as_shared_tags_rise(items in corpus(14)) {
        let candidates = score_pairs(&items);
        for p in &candidates {
            for q in &candidates {
                if p.shared_tag_count > q.shared_tag_count {
                    prop_assert!(p.weight >= q.weight);
                }
            }
        }
    }

    #[test]
    fn selection_respects_both_caps(
        items in corpus(18),
        max_pairs in 1usize..20,
        fan_out_cap in 1usize..5,
    ) {
        let config = ThreadConfig { max_pairs, fan_out_cap };
        let threads = select_threads(&score_pairs(&items), &config).unwrap();
        prop_assert!(threads.len() <= max_pairs);

        let graph = assemble_graph(&items, &threads);
        prop_assert_eq!(graph.edges.len(), threads.len());
        for node in &graph.nodes {
            prop_assert!(node.connection_count <= fan_out_cap);
        }
        for thread in &threads {
            prop_assert!(thread.from_id != thread.to_id);
        }
    }

    #[test]
    fn layout_stays_inside_the_canvas(
        items in corpus(16),
        width in 400.0f32..1200.0,
        height in 300.0f32..900.0,
    ) {
        let threads = select_threads(&score_pairs(&items), &ThreadConfig::default()).unwrap();
        let graph = assemble_graph(&items, &threads);
        let config = LayoutConfig {
            width,
            height,
            iterations: 80,
            ..LayoutConfig::default()
        };
        let layout = compute_layout(&graph, &config).unwrap();

        prop_assert_eq!(layout.len(), graph.nodes.len());
        for node in &layout {
            prop_assert!(node.x.is_finite() && node.y.is_finite());
            prop_assert!(node.x >= node.radius && node.x <= width - node.radius);
            prop_assert!(node.y >= node.radius && node.y <= height - node.radius);
        }
    }
}
