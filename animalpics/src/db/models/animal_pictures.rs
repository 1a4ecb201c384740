//! Database models for stored animal pictures.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::types::{AnimalType, PictureId};

/// Database entity model. Rows are never updated once written.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AnimalPicture {
    pub id: PictureId,
    pub animal_type: String,
    pub image_data: Vec<u8>,
    pub content_type: String,
    pub stored_at: DateTime<Utc>,
}

/// Request for appending a picture
#[derive(Debug, Clone)]
pub struct AnimalPictureCreateDBRequest {
    pub animal_type: AnimalType,
    pub image_data: Vec<u8>,
    pub content_type: String,
    pub stored_at: DateTime<Utc>,
}

impl AnimalPictureCreateDBRequest {
    /// Build the stored record once the store has assigned an id
    pub fn into_picture(self, id: PictureId) -> AnimalPicture {
        AnimalPicture {
            id,
            animal_type: self.animal_type.to_string(),
            image_data: self.image_data,
            content_type: self.content_type,
            stored_at: self.stored_at,
        }
    }
}
