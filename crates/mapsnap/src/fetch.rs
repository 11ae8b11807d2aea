use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;
use tracing::debug;

/// Retrieves rendered snapshot images.
///
/// Transport failures and non-2xx responses come back as the plain
/// [`reqwest::Error`]; nothing is retried.
#[derive(Clone, Default)]
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GETs `url` and yields the body chunk by chunk. Dropping the stream
    /// aborts the transfer.
    pub async fn stream(
        &self,
        url: &str,
    ) -> reqwest::Result<impl Stream<Item = reqwest::Result<Bytes>>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        debug!(
            status = %response.status(),
            content_length = ?response.content_length(),
            "snapshot response"
        );
        Ok(response.bytes_stream())
    }

    /// GETs `url` and collects the whole image.
    pub async fn bytes(&self, url: &str) -> reqwest::Result<Vec<u8>> {
        let mut stream = Box::pin(self.stream(url).await?);
        let mut image = Vec::new();
        while let Some(chunk) = stream.next().await {
            image.extend_from_slice(&chunk?);
        }
        Ok(image)
    }
}
