//! API request/response models for animal pictures.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::models::animal_pictures::AnimalPicture;
use crate::types::PictureId;

/// Query parameters for saving pictures
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SavePicturesQuery {
    /// How many pictures to fetch and store (defaults to 1)
    #[param(minimum = 1, example = 3)]
    pub count: Option<i64>,

    /// Requested width in pixels. Accepted for compatibility; no upstream uses it.
    pub width: Option<u32>,

    /// Requested height in pixels. Accepted for compatibility; no upstream uses it.
    pub height: Option<u32>,
}

/// A stored picture as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnimalPictureResponse {
    /// Identifier assigned by the store
    #[schema(example = 42)]
    pub id: PictureId,
    /// Lowercase animal type tag
    #[schema(example = "cat")]
    pub animal_type: String,
    /// Image bytes, base64 encoded
    #[schema(format = Byte)]
    pub image_data: String,
    /// MIME type of the image
    #[schema(example = "image/jpeg")]
    pub content_type: String,
    /// When the picture was stored (UTC)
    pub stored_at: DateTime<Utc>,
}

impl From<AnimalPicture> for AnimalPictureResponse {
    fn from(picture: AnimalPicture) -> Self {
        Self {
            id: picture.id,
            animal_type: picture.animal_type.to_lowercase(),
            image_data: STANDARD.encode(&picture.image_data),
            content_type: picture.content_type,
            stored_at: picture.stored_at,
        }
    }
}
