//! Picture acquisition: turning an animal type into stored image bytes.
//!
//! Acquiring one picture is two steps:
//!
//! 1. [`sources::SourceResolver`] asks the primary upstream API for an image URL, falling back
//!    to a fixed image endpoint when the primary fails in any way.
//! 2. [`fetcher::ImageFetcher`] downloads that URL and returns the bytes and content type.
//!
//! [`batch::save_batch`] repeats that `count` times, storing each picture as it arrives.
//!
//! The [`ImageSource`] trait is the seam between the orchestrator and the network, so batch
//! behaviour can be tested with scripted sources instead of live upstreams.

pub mod batch;
pub mod fetcher;
pub mod sources;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::Config;
use crate::types::AnimalType;
use fetcher::ImageFetcher;
use sources::SourceResolver;

pub use batch::{SaveError, save_batch};

/// Failures of the acquisition path that callers can see.
///
/// Upstream URL resolution never fails (it falls back), so the only runtime failure is the
/// image download itself.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Unsupported animal type '{0}'")]
    UnsupportedAnimalType(String),

    #[error("Failed to download image from {url}")]
    Download {
        url: Url,
        #[source]
        source: DownloadFailure,
    },
}

#[derive(Error, Debug)]
pub enum DownloadFailure {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(StatusCode),

    #[error("upstream returned an empty body")]
    EmptyBody,
}

/// Raw image as downloaded, before it is stored
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedImage {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Produces one image for an animal type per call.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn acquire(&self, animal_type: AnimalType) -> Result<DownloadedImage, AcquisitionError>;
}

/// The production [`ImageSource`]: resolve over HTTP, then download.
pub struct HttpImageSource {
    resolver: SourceResolver,
    fetcher: ImageFetcher,
}

impl HttpImageSource {
    /// Build from configuration. Resolution and download share one client and its timeout.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            resolver: SourceResolver::new(client.clone(), config.sources.clone()),
            fetcher: ImageFetcher::new(client),
        })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    #[instrument(skip(self), fields(animal_type = %animal_type), err)]
    async fn acquire(&self, animal_type: AnimalType) -> Result<DownloadedImage, AcquisitionError> {
        let resolved = self.resolver.resolve(animal_type).await;
        self.fetcher.fetch(&resolved.url).await
    }
}
