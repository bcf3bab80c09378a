use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use super::ContentType;
use crate::error::Result;

/// Raw content collections as they come off disk, one JSON record per entry.
///
/// Records stay as untyped values until the adapter looks at them so that a
/// single bad entry can be skipped without failing the whole corpus.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ContentSources {
    #[serde(default)]
    pub essays: Vec<Value>,
    #[serde(default, alias = "field-notes")]
    pub field_notes: Vec<Value>,
    #[serde(default)]
    pub projects: Vec<Value>,
    #[serde(default)]
    pub shelf: Vec<Value>,
}

impl ContentSources {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn records(&self, kind: ContentType) -> &[Value] {
        match kind {
            ContentType::Essay => &self.essays,
            ContentType::FieldNote => &self.field_notes,
            ContentType::Project => &self.projects,
            ContentType::Shelf => &self.shelf,
        }
    }

    pub fn len(&self) -> usize {
        ContentType::ALL
            .iter()
            .map(|kind| self.records(*kind).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A date as written in a record: ISO-8601 text or epoch milliseconds.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Text(String),
    Millis(i64),
}

impl RawDate {
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Text(raw) => parse_date(raw),
            Self::Millis(millis) => {
                DateTime::from_timestamp_millis(*millis).map(|value| value.date_naive())
            }
        }
    }
}

impl fmt::Display for RawDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(raw) => write!(f, "{raw:?}"),
            Self::Millis(millis) => write!(f, "{millis}"),
        }
    }
}

/// Essays, field notes and projects share one record shape.
#[derive(Clone, Debug, Deserialize)]
pub struct PostRecord {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub date: Option<RawDate>,
    #[serde(default)]
    pub draft: bool,
}

/// Shelf entries have no draft flag and are dated by acquisition.
#[derive(Clone, Debug, Deserialize)]
pub struct ShelfRecord {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "acquired")]
    pub date: Option<RawDate>,
}

#[derive(Clone, Debug)]
pub enum RawRecord {
    Essay(PostRecord),
    FieldNote(PostRecord),
    Project(PostRecord),
    Shelf(ShelfRecord),
}

impl RawRecord {
    pub fn parse(kind: ContentType, value: &Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            ContentType::Essay => Self::Essay(PostRecord::deserialize(value)?),
            ContentType::FieldNote => Self::FieldNote(PostRecord::deserialize(value)?),
            ContentType::Project => Self::Project(PostRecord::deserialize(value)?),
            ContentType::Shelf => Self::Shelf(ShelfRecord::deserialize(value)?),
        })
    }

    pub fn kind(&self) -> ContentType {
        match self {
            Self::Essay(_) => ContentType::Essay,
            Self::FieldNote(_) => ContentType::FieldNote,
            Self::Project(_) => ContentType::Project,
            Self::Shelf(_) => ContentType::Shelf,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Self::Essay(record) => &record.slug,
            Self::FieldNote(record) => &record.slug,
            Self::Project(record) => &record.slug,
            Self::Shelf(record) => &record.slug,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Essay(record) => &record.title,
            Self::FieldNote(record) => &record.title,
            Self::Project(record) => &record.title,
            Self::Shelf(record) => &record.title,
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            Self::Essay(record) => &record.tags,
            Self::FieldNote(record) => &record.tags,
            Self::Project(record) => &record.tags,
            Self::Shelf(record) => &record.tags,
        }
    }

    pub fn raw_date(&self) -> Option<&RawDate> {
        match self {
            Self::Essay(record) | Self::FieldNote(record) | Self::Project(record) => {
                record.date.as_ref()
            }
            Self::Shelf(record) => record.date.as_ref(),
        }
    }

    pub fn is_draft(&self) -> bool {
        match self {
            Self::Essay(record) => record.draft,
            Self::FieldNote(record) => record.draft,
            Self::Project(record) => record.draft,
            Self::Shelf(_) => false,
        }
    }
}

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Accepts plain dates, RFC 3339 timestamps and offset-less date-times.
/// Timestamps keep their local date.
pub(super) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.date_naive());
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|value| value.date())
}
