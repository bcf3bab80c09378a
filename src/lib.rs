//! Thread graph for a personal publishing site.
//!
//! Content collections are normalized into [`content::ContentItem`]s, every
//! pair is scored on shared tags and date proximity, a bounded set of threads
//! is selected, and the resulting node/edge graph is laid out with a small
//! deterministic force simulation.

pub mod config;
pub mod content;
pub mod error;
pub mod graph;
pub mod layout;
pub mod pipeline;
pub mod threads;

pub use config::GraphConfig;
pub use error::{GraphError, Result};
pub use pipeline::{ThreadGraph, ThreadGraphContext};
