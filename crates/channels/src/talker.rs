use async_trait::async_trait;

/// Outbound side of a conversation — the transport implements this for
/// both contacts and rooms.
///
/// Sends are awaited one at a time by the dispatcher, so implementations
/// do not need to preserve ordering across concurrent calls.
#[async_trait]
pub trait Talker: Send + Sync {
    /// Send a plain text message.
    async fn say_text(&self, text: &str) -> anyhow::Result<()>;

    /// Send an image by URL. The transport decides how to materialize it
    /// (download, re-upload, link preview, ...).
    async fn say_image(&self, url: &str) -> anyhow::Result<()>;
}
