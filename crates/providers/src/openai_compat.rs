//! OpenAI-compatible HTTP backend for chat completions and image
//! generation.
//!
//! Speaks `POST /v1/chat/completions` and `POST /v1/images/generations`
//! against any base URL, so self-hosted compatible servers work too.

use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::{debug, warn},
};

use {magpie_common::ChatRecord, magpie_config::ProviderConfig};

use crate::{CompletionBackend, ImageBackend};

/// Client for an OpenAI-compatible endpoint.
pub struct OpenAiChat {
    http: reqwest::Client,
    api_base: String,
    api_key: Secret<String>,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: &'a [ChatRecord],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    url: String,
}

impl OpenAiChat {
    pub fn new(cfg: &ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiChat {
    async fn complete(&self, session_key: &str, history: &[ChatRecord]) -> anyhow::Result<String> {
        let url = format!("{}/v1/chat/completions", self.api_base);
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: history,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(session_key, %status, "chat completion failed: {detail}");
            anyhow::bail!("chat completion failed with status {status}");
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        debug!(session_key, chars = content.chars().count(), "chat completion ok");
        Ok(content)
    }
}

#[async_trait]
impl ImageBackend for OpenAiChat {
    async fn generate(&self, session_key: &str, prompt: &str) -> anyhow::Result<String> {
        let url = format!("{}/v1/images/generations", self.api_base);
        let body = ImageRequest {
            prompt,
            n: 1,
            size: "512x512",
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(session_key, %status, "image generation failed: {detail}");
            anyhow::bail!("image generation failed with status {status}");
        }

        let parsed: ImageResponse = response.json().await?;
        let first = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("image generation returned no data"))?;
        debug!(session_key, "image generation ok");
        Ok(first.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> OpenAiChat {
        let cfg = ProviderConfig {
            api_base: server.url(),
            api_key: Secret::new("sk-test".into()),
            ..Default::default()
        };
        OpenAiChat::new(&cfg)
    }

    #[tokio::test]
    async fn completion_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"hello!"}}]}"#)
            .create_async()
            .await;

        let backend = client_for(&server);
        let history = vec![ChatRecord::system("sys"), ChatRecord::user("hi")];
        let reply = backend.complete("alice", &history).await.unwrap();
        assert_eq!(reply, "hello!");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn completion_with_null_content_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
            .create_async()
            .await;

        let backend = client_for(&server);
        let reply = backend
            .complete("alice", &[ChatRecord::user("hi")])
            .await
            .unwrap();
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn completion_error_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let backend = client_for(&server);
        let result = backend.complete("alice", &[ChatRecord::user("hi")]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn image_generation_returns_url() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/images/generations")
            .with_status(200)
            .with_body(r#"{"data":[{"url":"https://img.example/cat.png"}]}"#)
            .create_async()
            .await;

        let backend = client_for(&server);
        let url = backend.generate("room", "a cat").await.unwrap();
        assert_eq!(url, "https://img.example/cat.png");
    }

    #[tokio::test]
    async fn image_generation_without_data_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/images/generations")
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let backend = client_for(&server);
        assert!(backend.generate("room", "a cat").await.is_err());
    }
}
