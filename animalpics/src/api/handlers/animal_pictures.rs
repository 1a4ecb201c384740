use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::debug;

use crate::{
    AppState,
    acquisition::save_batch,
    api::models::animal_pictures::{AnimalPictureResponse, SavePicturesQuery},
    db::handlers::AnimalPictures,
    errors::{Error, Result},
    types::AnimalType,
};

/// Check the requested batch size against the configured maximum
fn validate_count(count: Option<i64>, max_count: u32) -> Result<u32> {
    let count = count.unwrap_or(1);
    if count < 1 || count > i64::from(max_count) {
        return Err(Error::BadRequest {
            message: format!("count must be between 1 and {max_count}, got {count}"),
        });
    }
    Ok(count as u32)
}

#[utoipa::path(
    post,
    path = "/animalpicture/{animal_type}",
    tag = "animal_pictures",
    summary = "Fetch and store pictures",
    description = "Fetches `count` pictures from the upstream source for the animal type and stores each one. \
                   If a picture after the first cannot be fetched or stored, the pictures saved so far are kept and the last one is returned.",
    params(
        ("animal_type" = String, Path, description = "Animal type: cat, dog or bear (case-insensitive)"),
        SavePicturesQuery,
    ),
    responses(
        (status = 200, description = "The last picture stored", body = AnimalPictureResponse),
        (status = 400, description = "Unsupported animal type or count out of range"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all, fields(animal_type = %animal_type))]
pub async fn save_pictures(
    State(state): State<AppState>,
    Path(animal_type): Path<String>,
    Query(query): Query<SavePicturesQuery>,
) -> Result<Json<AnimalPictureResponse>> {
    let animal_type: AnimalType = animal_type.parse()?;
    let count = validate_count(query.count, state.config.batch.max_count)?;

    if query.width.is_some() || query.height.is_some() {
        debug!(width = ?query.width, height = ?query.height, "Ignoring requested picture dimensions");
    }

    let picture = save_batch(&state.db, state.image_source.as_ref(), animal_type, count).await?;
    Ok(Json(picture.into()))
}

#[utoipa::path(
    get,
    path = "/animalpicture/{animal_type}/latest",
    tag = "animal_pictures",
    summary = "Get the latest picture",
    params(
        ("animal_type" = String, Path, description = "Animal type: cat, dog or bear (case-insensitive)"),
    ),
    responses(
        (status = 200, description = "Most recently stored picture", body = AnimalPictureResponse),
        (status = 400, description = "Unsupported animal type"),
        (status = 404, description = "No picture stored for this animal type"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all, fields(animal_type = %animal_type))]
pub async fn get_latest_picture(State(state): State<AppState>, Path(animal_type): Path<String>) -> Result<Json<AnimalPictureResponse>> {
    let animal_type: AnimalType = animal_type.parse()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let picture = AnimalPictures::new(&mut conn)
        .latest(animal_type)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Picture".to_string(),
            id: format!("for animal type '{animal_type}'"),
        })?;

    Ok(Json(picture.into()))
}
