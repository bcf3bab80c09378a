mod score;
mod select;

use serde::{Deserialize, Serialize};

use crate::content::{ContentItem, ContentType};
use crate::error::{GraphError, Result};

pub use score::{
    MISSING_DATE_DAYS, RECENCY_CAP_DAYS, RECENCY_PENALTY_PER_DAY, TAG_WEIGHT, score_pair,
    score_pairs,
};
pub use select::select_threads;

/// Topical strength of a thread, by number of shared tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weight {
    Light,
    Medium,
    Heavy,
}

impl Weight {
    /// `None` means the pair shares nothing and is not a candidate at all.
    pub fn from_shared_tags(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(Self::Light),
            2 => Some(Self::Medium),
            _ => Some(Self::Heavy),
        }
    }

    pub fn stroke_width(self) -> f32 {
        match self {
            Self::Heavy => 1.5,
            Self::Medium => 1.0,
            Self::Light => 0.5,
        }
    }
}

/// A scored candidate relationship. `a.id < b.id` always holds.
#[derive(Clone, Copy, Debug)]
pub struct ScoredPair<'a> {
    pub a: &'a ContentItem,
    pub b: &'a ContentItem,
    pub shared_tag_count: usize,
    pub days_apart: i64,
    pub score: f64,
    pub weight: Weight,
}

/// A relationship selected for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPair {
    pub from_id: String,
    pub to_id: String,
    pub from_slug: String,
    pub to_slug: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub weight: Weight,
    pub shared_tag_count: usize,
    pub score: f64,
    pub color: String,
}

impl ThreadPair {
    pub fn from_scored(pair: &ScoredPair<'_>) -> Self {
        // Threads are drawn from the written side.
        let kind = if pair.a.kind.is_written() {
            pair.a.kind
        } else {
            pair.b.kind
        };

        Self {
            from_id: pair.a.id.clone(),
            to_id: pair.b.id.clone(),
            from_slug: pair.a.slug.clone(),
            to_slug: pair.b.slug.clone(),
            kind,
            weight: pair.weight,
            shared_tag_count: pair.shared_tag_count,
            score: pair.score,
            color: kind.color().to_owned(),
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.from_id == id || self.to_id == id
    }

    pub fn other_end(&self, id: &str) -> Option<&str> {
        if self.from_id == id {
            Some(&self.to_id)
        } else if self.to_id == id {
            Some(&self.from_id)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Upper bound on the total number of accepted threads.
    pub max_pairs: usize,
    /// Upper bound on threads touching any single item.
    pub fan_out_cap: usize,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            max_pairs: 100,
            fan_out_cap: 6,
        }
    }
}

impl ThreadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_pairs == 0 {
            return Err(GraphError::InvalidPairCap(self.max_pairs));
        }
        if self.fan_out_cap == 0 {
            return Err(GraphError::InvalidFanOutCap(self.fan_out_cap));
        }
        Ok(())
    }
}

/// Threads touching one item, most significant first.
pub fn threads_for<'a>(pairs: &'a [ThreadPair], id: &str) -> Vec<&'a ThreadPair> {
    pairs.iter().filter(|pair| pair.touches(id)).collect()
}
