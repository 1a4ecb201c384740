//! Database layer for data persistence and access.
//!
//! Uses SQLx with SQLite. A single append-only table, `animal_pictures`, holds every stored
//! picture; its schema lives in `migrations/` and is applied on startup by
//! [`crate::migrator`].
//!
//! # Modules
//!
//! - [`handlers`]: Repositories wrapping a connection or transaction
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//! - [`pools`]: Pool construction from configuration
//!
//! # Transactions
//!
//! Writes go through a transaction so that committing is an explicit durability step:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let picture = AnimalPictures::new(&mut tx).add(request).await?;
//! tx.commit().await?;
//! ```
//!
//! Reads can use a pooled connection directly:
//!
//! ```ignore
//! let mut conn = pool.acquire().await?;
//! let latest = AnimalPictures::new(&mut conn).latest(AnimalType::Cat).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
pub mod pools;
