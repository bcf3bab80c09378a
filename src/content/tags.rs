use std::collections::HashMap;

use serde::Serialize;

use super::ContentItem;

/// A tag as written, with surrounding and repeated whitespace removed.
pub fn display_tag(tag: &str) -> String {
    tag.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive, whitespace-insensitive tag identity.
pub fn normalize_tag(tag: &str) -> String {
    display_tag(tag).to_lowercase()
}

/// URL form of a tag: "AI & Automation" becomes "ai-automation".
pub fn slugify_tag(tag: &str) -> String {
    let mut slug = String::with_capacity(tag.len());
    let mut pending_dash = false;

    for ch in tag.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub slug: String,
    pub display: String,
    pub count: usize,
}

/// Counts how many items carry each tag, keyed by tag slug. The display text
/// is the first spelling seen in corpus order.
pub fn tag_index(items: &[ContentItem]) -> Vec<TagCount> {
    let mut by_slug: HashMap<String, TagCount> = HashMap::new();

    for item in items {
        for tag in &item.tags {
            let slug = slugify_tag(tag);
            if slug.is_empty() {
                continue;
            }

            by_slug
                .entry(slug.clone())
                .and_modify(|entry| entry.count += 1)
                .or_insert_with(|| TagCount {
                    slug,
                    display: item.tag_label(tag).to_owned(),
                    count: 1,
                });
        }
    }

    let mut tags = by_slug.into_values().collect::<Vec<_>>();
    tags.sort_by(|a, b| {
        a.display
            .to_lowercase()
            .cmp(&b.display.to_lowercase())
            .then_with(|| a.slug.cmp(&b.slug))
    });
    tags
}
