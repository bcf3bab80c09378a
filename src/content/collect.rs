use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use super::parse::{ContentSources, RawRecord};
use super::{ContentItem, ContentType};

#[derive(Debug, Error)]
enum RecordIssue {
    #[error("slug is blank")]
    BlankSlug,
    #[error("title is blank")]
    BlankTitle,
    #[error("unrecognized date {0}")]
    BadDate(String),
}

fn item_from_record(record: &RawRecord) -> Result<ContentItem, RecordIssue> {
    let slug = record.slug().trim();
    if slug.is_empty() {
        return Err(RecordIssue::BlankSlug);
    }

    let title = record.title().trim();
    if title.is_empty() {
        return Err(RecordIssue::BlankTitle);
    }

    let date = match record.raw_date() {
        Some(raw) => Some(raw.to_date().ok_or_else(|| RecordIssue::BadDate(raw.to_string()))?),
        None => None,
    };

    Ok(ContentItem::new(
        record.kind(),
        slug,
        title,
        record.tags(),
        date,
    ))
}

/// Flattens every collection into one ordered list of items.
///
/// Collections are visited in [`ContentType::ALL`] order and records keep
/// their source order within a collection. Drafts are excluded; malformed
/// records and repeated ids are logged and skipped.
pub fn normalize_corpus(sources: &ContentSources) -> Vec<ContentItem> {
    let mut items = Vec::with_capacity(sources.len());
    let mut seen = HashSet::with_capacity(sources.len());
    let mut skipped = 0usize;
    let mut drafts = 0usize;

    for kind in ContentType::ALL {
        for (index, value) in sources.records(kind).iter().enumerate() {
            let record = match RawRecord::parse(kind, value) {
                Ok(record) => record,
                Err(error) => {
                    warn!(collection = kind.collection(), index, %error, "skipping malformed content record");
                    skipped += 1;
                    continue;
                }
            };

            if record.is_draft() {
                drafts += 1;
                continue;
            }

            let item = match item_from_record(&record) {
                Ok(item) => item,
                Err(issue) => {
                    warn!(collection = kind.collection(), index, slug = record.slug(), %issue, "skipping malformed content record");
                    skipped += 1;
                    continue;
                }
            };

            if !seen.insert(item.id.clone()) {
                warn!(collection = kind.collection(), index, id = %item.id, "skipping duplicate content id");
                skipped += 1;
                continue;
            }

            items.push(item);
        }
    }

    debug!(items = items.len(), drafts, skipped, "normalized content corpus");
    items
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn normalize_with_logs(corpus: &ContentSources) -> (Vec<ContentItem>, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let items = tracing::subscriber::with_default(subscriber, || normalize_corpus(corpus));
        (items, logs.contents())
    }

    fn sources(value: serde_json::Value) -> ContentSources {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn collections_are_grouped_in_fixed_type_order() {
        let corpus = sources(json!({
            "shelf": [{"slug": "book", "title": "Book", "tags": ["a"]}],
            "projects": [{"slug": "site", "title": "Site"}],
            "field_notes": [{"slug": "n2", "title": "N2"}, {"slug": "n1", "title": "N1"}],
            "essays": [{"slug": "e1", "title": "E1", "date": "2024-01-01"}],
        }));

        let ids = normalize_corpus(&corpus)
            .into_iter()
            .map(|item| item.id)
            .collect::<Vec<_>>();

        assert_eq!(
            ids,
            [
                "essay-e1",
                "field-note-n2",
                "field-note-n1",
                "project-site",
                "shelf-book"
            ]
        );
    }

    #[test]
    fn drafts_are_excluded() {
        let corpus = sources(json!({
            "essays": [
                {"slug": "live", "title": "Live"},
                {"slug": "wip", "title": "WIP", "draft": true},
            ],
        }));

        let items = normalize_corpus(&corpus);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].slug, "live");
    }

    #[test]
    fn malformed_records_are_skipped_without_failing_the_corpus() {
        let corpus = sources(json!({
            "essays": [
                {"title": "No slug"},
                {"slug": "  ", "title": "Blank slug"},
                {"slug": "bad-date", "title": "Bad date", "date": "someday"},
                {"slug": "tags-wrong", "title": "Wrong tags", "tags": "not-a-list"},
                42,
                {"slug": "ok", "title": "Fine", "tags": ["Design"]},
            ],
        }));

        let (items, logs) = normalize_with_logs(&corpus);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "essay-ok");
        assert!(items[0].tags.contains("design"));

        let warnings = logs
            .lines()
            .filter(|line| line.contains("WARN") && line.contains("skipping malformed content record"))
            .count();
        assert_eq!(warnings, 5, "{logs}");
        assert!(logs.contains("slug is blank"));
        assert!(logs.contains("unrecognized date"));
    }

    #[test]
    fn repeated_ids_keep_the_first_record() {
        let corpus = sources(json!({
            "field_notes": [
                {"slug": "n", "title": "First"},
                {"slug": "n", "title": "Second"},
            ],
        }));

        let (items, logs) = normalize_with_logs(&corpus);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "First");
        assert!(logs.contains("skipping duplicate content id"), "{logs}");
    }

    #[test]
    fn same_slug_in_different_collections_does_not_collide() {
        let corpus = sources(json!({
            "essays": [{"slug": "maps", "title": "Maps"}],
            "shelf": [{"slug": "maps", "title": "Maps (book)"}],
        }));

        assert_eq!(normalize_corpus(&corpus).len(), 2);
    }

    #[test]
    fn timestamp_dates_keep_the_record() {
        let corpus = sources(json!({
            "essays": [
                {"slug": "a", "title": "A", "date": "2024-01-05T10:00:00"},
                {"slug": "b", "title": "B", "date": "2024-01-05T10:00:00.000Z"},
                {"slug": "c", "title": "C", "date": "2024-01-05 10:00"},
                {"slug": "d", "title": "D", "date": 1_704_448_800_000_i64},
            ],
        }));

        let items = normalize_corpus(&corpus);
        let ids = items.iter().map(|item| item.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["essay-a", "essay-b", "essay-c", "essay-d"]);
        assert!(
            items
                .iter()
                .all(|item| item.date == chrono::NaiveDate::from_ymd_opt(2024, 1, 5))
        );
    }
}
