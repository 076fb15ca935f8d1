//! Revision materials
//!
//! Named blocks of study text kept in a small key-value store, plus the
//! form rules used when creating or editing them.

pub mod database;
pub mod form;
pub mod model;
pub mod repository;

pub use database::Database;
pub use form::{FieldErrors, MaterialForm};
pub use model::{MaterialPatch, NewMaterial, RevisionMaterial};
pub use repository::MaterialRepository;

/// Errors raised by the materials layer
#[derive(Debug, thiserror::Error)]
pub enum MaterialError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Failed to encode revision materials: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid material: {0}")]
    Invalid(FieldErrors),

    #[error("Material '{0}' not found")]
    NotFound(String),
}

pub type MaterialResult<T> = std::result::Result<T, MaterialError>;
