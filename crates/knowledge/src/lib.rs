//! Community-contributed key/value facts.
//!
//! Two retrieval disciplines exist side by side:
//! - [`KnowledgeStore`] merges re-taught keys (`old + "\n" + new`) and
//!   matches by exact key or by keys contained in the query text;
//! - [`WikiStore`] keeps every contribution as an independent entry and
//!   matches by exact key equality only, concatenating at read time.
//!
//! Both are in-memory and authoritative; remote persistence is
//! write-behind and handled by the caller.

pub mod store;
pub mod wiki;

pub use {
    store::{KnowledgeEntry, KnowledgeStore},
    wiki::WikiStore,
};
