//! Write-behind remote persistence for users and taught knowledge.
//!
//! The in-memory stores are always authoritative; everything here is a
//! fire-and-forget side effect. Failures are logged and never retried,
//! and nothing in the dispatch path ever awaits a remote save.

pub mod http;

use std::sync::Arc;

use {async_trait::async_trait, thiserror::Error, tracing::warn};

pub use http::HttpRemoteStore;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("remote store rejected the write: {status}")]
    Rejected { status: u16 },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Durable mirror of user levels and taught facts.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn save_user(&self, username: &str, level: i64) -> Result<()>;

    async fn save_knowledge(&self, key: &str, value: &str, contributor: &str) -> Result<()>;
}

/// Persist a user level in the background. Send-and-forget: the spawned
/// task logs failures and is never joined.
pub fn save_user_detached(store: Arc<dyn RemoteStore>, username: String, level: i64) {
    tokio::spawn(async move {
        if let Err(e) = store.save_user(&username, level).await {
            warn!(username, level, error = %e, "remote user save failed");
        }
    });
}

/// Persist a taught fact in the background, same contract as
/// [`save_user_detached`].
pub fn save_knowledge_detached(
    store: Arc<dyn RemoteStore>,
    key: String,
    value: String,
    contributor: String,
) {
    tokio::spawn(async move {
        if let Err(e) = store.save_knowledge(&key, &value, &contributor).await {
            warn!(key, contributor, error = %e, "remote knowledge save failed");
        }
    });
}
