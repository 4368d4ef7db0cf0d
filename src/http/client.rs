//! HTTP client with per-call timeouts and streamed downloads.

use anyhow::{Context, Result, anyhow};
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use std::io::Write;
use std::time::Duration;

use super::status::classify_status;

/// Largest piece written to the destination between progress reports.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8 * 1024;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client that identifies itself with `user_agent` and, when a
    /// token is given, authenticates with it on every request.
    pub fn with_user_agent(user_agent: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("GITHUB_TOKEN contains invalid header characters")?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using GITHUB_TOKEN for authentication");
        }

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(client))
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request and deserializes the JSON response.
    /// The whole exchange must finish within `timeout`.
    #[tracing::instrument(skip(self, timeout))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        accept: &str,
        timeout: Duration,
    ) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .timeout(timeout)
            .send()
            .await
            .context("Failed to send request")?;

        let response = response.error_for_status().map_err(classify_status)?;

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Streams `url` into the writer returned by `create_writer`.
    ///
    /// The writer is created only after the server answered with a success
    /// status. Every network read must complete within `idle_timeout`.
    /// `on_progress` is called after each piece of at most
    /// [`DOWNLOAD_CHUNK_SIZE`] bytes with the running byte count and the
    /// declared content length, if any. Returns the number of bytes written.
    #[tracing::instrument(skip(self, idle_timeout, create_writer, on_progress))]
    pub async fn download_file<W, F, P>(
        &self,
        url: &str,
        idle_timeout: Duration,
        create_writer: F,
        mut on_progress: P,
    ) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
        P: FnMut(u64, Option<u64>),
    {
        debug!("Downloading file from {}...", url);

        let response = tokio::time::timeout(idle_timeout, self.client.get(url).send())
            .await
            .map_err(|_| anyhow!("Timed out waiting for a response from {}", url))?
            .context("Failed to start download request")?;

        let mut response = response.error_for_status().map_err(classify_status)?;
        let total = response.content_length();

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        loop {
            let chunk = tokio::time::timeout(idle_timeout, response.chunk())
                .await
                .map_err(|_| {
                    anyhow!(
                        "Download stalled for more than {} seconds",
                        idle_timeout.as_secs()
                    )
                })?
                .context("Failed to read chunk from download stream")?;

            let Some(chunk) = chunk else { break };

            for piece in chunk.chunks(DOWNLOAD_CHUNK_SIZE) {
                writer
                    .write_all(piece)
                    .context("Failed to write chunk to file")?;
                downloaded_bytes += piece.len() as u64;
                on_progress(downloaded_bytes, total);
            }
        }

        writer.flush().context("Failed to flush downloaded file")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}
