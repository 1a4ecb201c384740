//! Repository implementations for database access.
//!
//! Each repository wraps a `&mut SqliteConnection` (a pooled connection or an open
//! transaction) and returns models from [`crate::db::models`].
//!
//! - [`AnimalPictures`]: append and look up stored pictures

pub mod animal_pictures;

pub use animal_pictures::AnimalPictures;
