//! Database record models matching table schemas.

pub mod animal_pictures;
