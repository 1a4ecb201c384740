//! Batch save: acquire and store `count` pictures, one at a time.
//!
//! The partial-failure policy is lopsided:
//!
//! - if the first picture cannot be acquired or stored, the error is returned and nothing is stored;
//! - if a later picture fails, acquisition or storage alike, the loop stops and the last stored
//!   picture is returned.
//!
//! Each picture is committed in its own transaction before the next acquisition starts. If the
//! caller drops the future mid-iteration, the in-flight request is aborted and the open
//! transaction rolls back, so only whole pictures are ever persisted.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    acquisition::{AcquisitionError, DownloadedImage, ImageSource},
    db::{
        errors::DbError,
        handlers::AnimalPictures,
        models::animal_pictures::{AnimalPicture, AnimalPictureCreateDBRequest},
    },
    types::AnimalType,
};

#[derive(Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Database(#[from] DbError),

    /// The loop finished without storing anything. Only reachable with `count == 0`.
    #[error("Batch of {animal_type} pictures completed without saving any")]
    NothingSaved { animal_type: AnimalType },
}

impl From<sqlx::Error> for SaveError {
    fn from(err: sqlx::Error) -> Self {
        SaveError::Database(err.into())
    }
}

/// Acquire and store up to `count` pictures, returning the last one stored.
#[instrument(skip(db, source), fields(animal_type = %animal_type), err)]
pub async fn save_batch(
    db: &SqlitePool,
    source: &dyn ImageSource,
    animal_type: AnimalType,
    count: u32,
) -> Result<AnimalPicture, SaveError> {
    let mut last_saved: Option<AnimalPicture> = None;

    for iteration in 0..count {
        let saved = match source.acquire(animal_type).await {
            Ok(image) => store_picture(db, animal_type, image).await,
            Err(e) => Err(e.into()),
        };

        match (saved, last_saved.take()) {
            (Ok(picture), _) => {
                metrics::counter!("animalpics_pictures_saved_total", "animal_type" => animal_type.as_str()).increment(1);
                debug!(iteration, id = picture.id, bytes = picture.image_data.len(), "Saved picture");
                last_saved = Some(picture);
            }
            (Err(e), Some(picture)) => {
                warn!(
                    iteration,
                    requested = count,
                    last_saved_id = picture.id,
                    error = %e,
                    "Batch stopped early, returning the last saved picture"
                );
                return Ok(picture);
            }
            (Err(e), None) => return Err(e),
        }
    }

    match last_saved {
        Some(picture) => {
            info!(count, id = picture.id, "Saved picture batch");
            Ok(picture)
        }
        None => {
            error!(count, "Batch save finished without saving a picture");
            Err(SaveError::NothingSaved { animal_type })
        }
    }
}

/// Store one picture in its own transaction
async fn store_picture(db: &SqlitePool, animal_type: AnimalType, image: DownloadedImage) -> Result<AnimalPicture, SaveError> {
    let request = AnimalPictureCreateDBRequest {
        animal_type,
        image_data: image.bytes.to_vec(),
        content_type: image.content_type,
        stored_at: Utc::now(),
    };

    let mut tx = db.begin().await?;
    let picture = AnimalPictures::new(&mut tx).add(request).await?;
    tx.commit().await?;

    Ok(picture)
}
