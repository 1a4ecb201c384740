//! OpenAPI documentation for the picture API at `/api/*`.

use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Animal Pictures API",
        description = "Fetch cat, dog and bear pictures from public image APIs, store them, and read back the latest one."
    ),
    servers(
        (url = "/api", description = "Picture API")
    ),
    paths(
        api::handlers::animal_pictures::save_pictures,
        api::handlers::animal_pictures::get_latest_picture,
    ),
    components(schemas(
        api::models::animal_pictures::AnimalPictureResponse,
        crate::types::AnimalType,
    )),
    tags(
        (name = "animal_pictures", description = "Save and retrieve animal pictures"),
    )
)]
pub struct ApiDoc;
