/// Meme Service Library
///
/// A small REST backend managing meme post records. Posts carry an
/// auto-incrementing integer id allocated from a named counter row, so ids
/// stay unique and strictly increasing across concurrent writers and across
/// multiple service instances.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and wire-level request/response types
/// - `models`: Post record and the partial shapes used for create/update
/// - `services`: Business logic layer (validation, duplicate detection,
///   id allocation, orchestration)
/// - `db`: Database access layer (post repository, sequence allocator)
/// - `error`: Error types and HTTP status mapping
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
