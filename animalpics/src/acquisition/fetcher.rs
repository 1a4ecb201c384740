//! Single-shot image downloads.

use reqwest::{Client, header::CONTENT_TYPE};
use tracing::{debug, instrument};
use url::Url;

use crate::acquisition::{AcquisitionError, DownloadFailure, DownloadedImage};

/// Content type recorded when the upstream does not send a usable one
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Downloads images. No retries: which URL to try is the resolver's job.
#[derive(Clone)]
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    /// The client's timeout bounds each download
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    #[instrument(skip(self), fields(url = %url), err)]
    pub async fn fetch(&self, url: &Url) -> Result<DownloadedImage, AcquisitionError> {
        let download_error = |source: DownloadFailure| AcquisitionError::Download { url: url.clone(), source };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| download_error(DownloadFailure::Transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_error(DownloadFailure::Status(status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(media_type_essence)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let bytes = response.bytes().await.map_err(|e| download_error(DownloadFailure::Transport(e)))?;
        if bytes.is_empty() {
            return Err(download_error(DownloadFailure::EmptyBody));
        }

        debug!(bytes = bytes.len(), %content_type, "Downloaded image");
        Ok(DownloadedImage { bytes, content_type })
    }
}

/// `image/png; charset=binary` -> `image/png`
fn media_type_essence(header: &str) -> Option<String> {
    let essence = header.split(';').next()?.trim();
    if essence.is_empty() {
        return None;
    }
    Some(essence.to_ascii_lowercase())
}
