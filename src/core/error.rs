use thiserror::Error;

#[derive(Error, Debug)]
pub enum UniverseError {
    #[error("Invalid interaction: requires at least two participants, got {participants}")]
    InvalidInteraction { participants: usize },

    #[error("Entity not found: {0:?}")]
    EntityNotFound(crate::core::types::EntityId),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UniverseError>;
