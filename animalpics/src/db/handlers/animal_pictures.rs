//! Database repository for animal pictures.
//!
//! The table is append-only: pictures are inserted and read back, never updated or deleted.
//! Writes happen inside a caller-owned transaction, so committing that transaction is the
//! durability boundary for [`AnimalPictures::add`].

use sqlx::SqliteConnection;
use tracing::instrument;

use crate::{
    db::{
        errors::Result,
        models::animal_pictures::{AnimalPicture, AnimalPictureCreateDBRequest},
    },
    types::{AnimalType, PictureId},
};

pub struct AnimalPictures<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> AnimalPictures<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Append a picture, returning it with its assigned id
    #[instrument(skip(self, request), fields(animal_type = %request.animal_type, bytes = request.image_data.len()), err)]
    pub async fn add(&mut self, request: AnimalPictureCreateDBRequest) -> Result<AnimalPicture> {
        let id: PictureId = sqlx::query_scalar(
            r#"
            INSERT INTO animal_pictures (animal_type, image_data, content_type, stored_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(request.animal_type.as_str())
        .bind(&request.image_data)
        .bind(&request.content_type)
        .bind(request.stored_at)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(request.into_picture(id))
    }

    /// Most recently stored picture for an animal type.
    ///
    /// Matching ignores case. Equal timestamps resolve to the last inserted row.
    #[instrument(skip(self), err)]
    pub async fn latest(&mut self, animal_type: AnimalType) -> Result<Option<AnimalPicture>> {
        let picture = sqlx::query_as::<_, AnimalPicture>(
            r#"
            SELECT id, animal_type, image_data, content_type, stored_at
            FROM animal_pictures
            WHERE animal_type = ? COLLATE NOCASE
            ORDER BY stored_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(animal_type.as_str())
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(picture)
    }

    /// Number of stored pictures for an animal type
    #[instrument(skip(self), err)]
    pub async fn count(&mut self, animal_type: AnimalType) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM animal_pictures WHERE animal_type = ? COLLATE NOCASE")
            .bind(animal_type.as_str())
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }
}
