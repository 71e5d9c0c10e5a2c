use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SpendwiseError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: Uuid },
}
