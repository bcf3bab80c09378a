mod collect;
mod parse;
mod tags;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use collect::normalize_corpus;
pub use parse::{ContentSources, PostRecord, RawDate, RawRecord, ShelfRecord};
pub use tags::{TagCount, display_tag, normalize_tag, slugify_tag, tag_index};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Essay,
    FieldNote,
    Project,
    Shelf,
}

impl ContentType {
    /// Fixed collection order used by the corpus adapter.
    pub const ALL: [Self; 4] = [Self::Essay, Self::FieldNote, Self::Project, Self::Shelf];

    pub fn label(self) -> &'static str {
        match self {
            Self::Essay => "essay",
            Self::FieldNote => "field-note",
            Self::Project => "project",
            Self::Shelf => "shelf",
        }
    }

    pub fn collection(self) -> &'static str {
        match self {
            Self::Essay => "essays",
            Self::FieldNote => "field-notes",
            Self::Project => "projects",
            Self::Shelf => "shelf",
        }
    }

    /// Threads only originate from written content.
    pub fn is_written(self) -> bool {
        matches!(self, Self::Essay | Self::FieldNote)
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Essay => "#B45A2D",
            Self::FieldNote => "#2D5F6B",
            Self::Project => "#C49A4A",
            Self::Shelf => "#5A7A4A",
        }
    }

    pub fn href(self, slug: &str) -> String {
        match self {
            Self::Essay => format!("/essays/{slug}"),
            Self::FieldNote => format!("/field-notes/{slug}"),
            Self::Project => format!("/projects#{slug}"),
            Self::Shelf => format!("/shelf#{slug}"),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A published piece of content in the uniform shape every later stage reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub title: String,
    pub slug: String,
    pub tags: BTreeSet<String>,
    /// Normalized tag to the text it was first written as.
    #[serde(default)]
    pub tag_labels: BTreeMap<String, String>,
    pub date: Option<NaiveDate>,
}

impl ContentItem {
    /// Builds an item from already-typed data. Tags are normalized and blank
    /// tags dropped, the id is `<type>-<slug>`.
    pub fn new<I, S>(
        kind: ContentType,
        slug: impl Into<String>,
        title: impl Into<String>,
        tags: I,
        date: Option<NaiveDate>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let slug = slug.into();
        let mut tag_labels = BTreeMap::new();
        for tag in tags {
            let label = display_tag(tag.as_ref());
            if !label.is_empty() {
                tag_labels.entry(label.to_lowercase()).or_insert(label);
            }
        }
        let tags = tag_labels.keys().cloned().collect();

        Self {
            id: content_id(kind, &slug),
            kind,
            title: title.into(),
            slug,
            tags,
            tag_labels,
            date,
        }
    }

    /// Display text for one of this item's normalized tags.
    pub fn tag_label<'a>(&'a self, tag: &'a str) -> &'a str {
        self.tag_labels.get(tag).map_or(tag, String::as_str)
    }

    pub fn href(&self) -> String {
        self.kind.href(&self.slug)
    }

    pub fn shared_tag_count(&self, other: &Self) -> usize {
        self.tags.intersection(&other.tags).count()
    }

    pub fn days_apart(&self, other: &Self) -> Option<i64> {
        match (self.date, other.date) {
            (Some(a), Some(b)) => Some((a - b).num_days().abs()),
            _ => None,
        }
    }
}

pub fn content_id(kind: ContentType, slug: &str) -> String {
    format!("{}-{slug}", kind.label())
}
