//! Upstream image URL resolution.
//!
//! Each animal type has a primary JSON API that points at a picture, and a fallback URL that is
//! itself an image. The three primaries answer in unrelated shapes, so each gets its own parser:
//!
//! | type | response shape                        |
//! |------|---------------------------------------|
//! | cat  | `[{"url": "..."}, ...]` (first entry) |
//! | dog  | `{"message": "..."}`                  |
//! | bear | `{"urls": {"regular": "..."}}`        |
//!
//! Anything going wrong with the primary (transport, status, body shape, bad URL) resolves to the
//! fallback. Fallbacks are logged and counted so an upstream outage is visible in metrics, but
//! callers get a usable URL either way.

use anyhow::{Context, anyhow, bail};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::acquisition::AcquisitionError;
use crate::config::SourcesConfig;
use crate::types::AnimalType;

#[derive(Debug, Deserialize)]
struct CatImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct DogImage {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BearPhoto {
    urls: BearPhotoUrls,
}

#[derive(Debug, Deserialize)]
struct BearPhotoUrls {
    regular: String,
}

fn parse_url(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("image url is empty");
    }
    Url::parse(raw).with_context(|| format!("invalid image url '{raw}'"))
}

/// Cat API: an array of images, the first one is used
pub fn parse_cat_response(body: &str) -> anyhow::Result<Url> {
    let images: Vec<CatImage> = serde_json::from_str(body)?;
    let first = images.into_iter().next().ok_or_else(|| anyhow!("response contained no images"))?;
    parse_url(&first.url)
}

/// Dog API: the URL is the `message` field
pub fn parse_dog_response(body: &str) -> anyhow::Result<Url> {
    let image: DogImage = serde_json::from_str(body)?;
    let message = image.message.ok_or_else(|| anyhow!("response has no message field"))?;
    parse_url(&message)
}

/// Bear API (Unsplash random photo): the URL is `urls.regular`
pub fn parse_bear_response(body: &str) -> anyhow::Result<Url> {
    let photo: BearPhoto = serde_json::from_str(body)?;
    parse_url(&photo.urls.regular)
}

/// Extract the image URL from a primary response body for the given animal type
pub fn parse_image_url(animal_type: AnimalType, body: &str) -> anyhow::Result<Url> {
    match animal_type {
        AnimalType::Cat => parse_cat_response(body),
        AnimalType::Dog => parse_dog_response(body),
        AnimalType::Bear => parse_bear_response(body),
    }
}

/// Where a resolved URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlOrigin {
    Primary,
    Fallback,
}

impl UrlOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlOrigin::Primary => "primary",
            UrlOrigin::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImageUrl {
    pub url: Url,
    pub origin: UrlOrigin,
}

/// Resolves animal types to image URLs using the configured upstream table.
pub struct SourceResolver {
    client: Client,
    sources: SourcesConfig,
}

impl SourceResolver {
    pub fn new(client: Client, sources: SourcesConfig) -> Self {
        Self { client, sources }
    }

    /// Resolve a raw animal tag. Unknown tags are the only error.
    pub async fn resolve_image_url(&self, animal_type: &str) -> Result<ResolvedImageUrl, AcquisitionError> {
        let animal_type: AnimalType = animal_type.parse()?;
        Ok(self.resolve(animal_type).await)
    }

    /// Resolve an image URL, using the fallback if the primary fails for any reason.
    #[instrument(skip(self), fields(animal_type = %animal_type))]
    pub async fn resolve(&self, animal_type: AnimalType) -> ResolvedImageUrl {
        let source = self.sources.get(animal_type);

        let resolved = match self.query_primary(animal_type, &source.primary_url).await {
            Ok(url) => {
                debug!(%url, "Resolved image url from primary source");
                ResolvedImageUrl {
                    url,
                    origin: UrlOrigin::Primary,
                }
            }
            Err(e) => {
                warn!(
                    error = %format!("{e:#}"),
                    primary_url = %source.primary_url,
                    fallback_url = %source.fallback_url,
                    "Primary image source failed, using fallback"
                );
                ResolvedImageUrl {
                    url: source.fallback_url.clone(),
                    origin: UrlOrigin::Fallback,
                }
            }
        };

        metrics::counter!(
            "animalpics_image_url_resolutions_total",
            "animal_type" => animal_type.as_str(),
            "origin" => resolved.origin.as_str()
        )
        .increment(1);

        resolved
    }

    async fn query_primary(&self, animal_type: AnimalType, primary_url: &Url) -> anyhow::Result<Url> {
        let response = self.client.get(primary_url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            bail!("primary source returned status {status}");
        }

        let body = response.text().await?;
        parse_image_url(animal_type, &body).with_context(|| format!("unexpected {animal_type} response shape"))
    }
}
