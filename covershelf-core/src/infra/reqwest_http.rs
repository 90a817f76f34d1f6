use std::{fmt, path::Path, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::{
    error::{CoverError, Result},
    infra::atomic_file,
    ports::{HeadResponse, HttpClient},
};

/// [`HttpClient`] backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl fmt::Debug for ReqwestHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestHttpClient")
            .field("client", &self.client)
            .finish()
    }
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        // Image bytes are compared against Content-Length, so keep the
        // transfer encoding identity.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .no_deflate()
            .no_zstd()
            .no_brotli()
            .no_gzip()
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn checked_get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CoverError::HttpStatus {
                status: response.status(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn head(&self, url: &str) -> Result<HeadResponse> {
        let response = self.client.head(url).send().await?;
        if !response.status().is_success() {
            return Err(CoverError::HttpStatus {
                status: response.status(),
                url: url.to_string(),
            });
        }

        // `Response::content_length` reports the body size, which is zero
        // for HEAD; read the header instead.
        let content_length = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());

        Ok(HeadResponse { content_length })
    }

    async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        let response = self.checked_get(url).await?;
        Ok(response.bytes().await?)
    }

    async fn download_file(&self, url: &str, path: &Path) -> Result<()> {
        let response = self.checked_get(url).await?;
        let tmp = atomic_file::temp_path_for(path);

        let streamed = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            let mut body = response.bytes_stream();
            let mut written = 0u64;
            while let Some(chunk) = body.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            file.sync_all().await?;
            Ok::<_, CoverError>(written)
        }
        .await;

        match streamed {
            Ok(written) => {
                debug!(
                    url,
                    path = %path.display(),
                    bytes = written,
                    "download complete"
                );
                atomic_file::persist(&tmp, path).await
            }
            Err(err) => {
                let _ = tokio::fs::remove_file(&tmp).await;
                Err(err)
            }
        }
    }
}
