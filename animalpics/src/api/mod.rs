//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures
//!
//! # API Structure
//!
//! All REST endpoints live under `/api`:
//!
//! - `POST /api/animalpicture/{animalType}?count=N`: fetch and store `N` pictures
//! - `GET /api/animalpicture/{animalType}/latest`: most recently stored picture
//!
//! # OpenAPI Documentation
//!
//! Endpoints are documented with `utoipa`. The document is served at `/api-docs/openapi.json`
//! and rendered at `/docs` when the server is running.

pub mod handlers;
pub mod models;
