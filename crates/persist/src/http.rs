use {async_trait::async_trait, serde::Serialize, tracing::debug};

use crate::{Error, RemoteStore, Result};

/// JSON-over-HTTP remote store: `POST {base}/users` and
/// `POST {base}/knowledge`.
pub struct HttpRemoteStore {
    http: reqwest::Client,
    api_base: String,
}

#[derive(Serialize)]
struct UserBody<'a> {
    username: &'a str,
    level: i64,
}

#[derive(Serialize)]
struct KnowledgeBody<'a> {
    key: &'a str,
    value: &'a str,
    contributor: &'a str,
}

impl HttpRemoteStore {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = format!("{}{path}", self.api_base);
        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Rejected {
                status: status.as_u16(),
            });
        }
        debug!(%url, "remote save ok");
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn save_user(&self, username: &str, level: i64) -> Result<()> {
        self.post("/users", &UserBody { username, level }).await
    }

    async fn save_knowledge(&self, key: &str, value: &str, contributor: &str) -> Result<()> {
        self.post(
            "/knowledge",
            &KnowledgeBody {
                key,
                value,
                contributor,
            },
        )
        .await
    }
}
