use async_trait::async_trait;

use crate::{
    domain::{ChannelId, DocumentRecord},
    Result,
};

/// Port for retrieving the fully rendered HTML of the target page.
///
/// The listing is client-rendered, so the production implementation drives a
/// headless browser; tests substitute canned HTML.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_rendered(&self, url: &str) -> Result<String>;
}

/// Port for resolving per-document metadata (the server-reported filename).
///
/// Enrichment is best-effort by contract: implementations leave `filename`
/// unset on failure rather than surfacing an error, so the method is
/// infallible.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn attach_filenames(&self, records: &mut [DocumentRecord]);
}

/// Port for delivering announcement messages to a chat channel.
///
/// Discord is the first implementation; the shape is small enough that other
/// platforms (Slack, Telegram) fit behind the same interface.
#[async_trait]
pub trait NotifySink: Send + Sync {
    async fn send(&self, channel: ChannelId, content: &str) -> Result<()>;
}
