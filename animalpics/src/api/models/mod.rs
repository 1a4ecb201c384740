//! API request and response data models.
//!
//! API models are distinct from database models: stored bytes are exposed as base64, field
//! names are camelCase, and every model is annotated with `utoipa` for the generated docs.
//!
//! - [`animal_pictures`]: stored picture responses and save query parameters

pub mod animal_pictures;
