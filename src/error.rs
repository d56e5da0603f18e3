use thiserror::Error;

use crate::store::ValueKind;

pub type PreferenceResult<T> = Result<T, PreferenceError>;

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error(transparent)]
    Sled(#[from] sled::Error),
    #[error(transparent)]
    Encode(#[from] bincode::error::EncodeError),
    #[error(transparent)]
    Decode(#[from] bincode::error::DecodeError),
    #[error("preference `{key}` holds a {found} value, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("failed to deserialize preference `{key}`")]
    Deserialize {
        key: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("migration to version {version} failed")]
    Migration {
        version: i32,
        #[source]
        source: anyhow::Error,
    },
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl PreferenceError {
    pub fn deserialize(key: &str, source: anyhow::Error) -> Self {
        PreferenceError::Deserialize {
            key: key.to_string(),
            source,
        }
    }

    pub fn migration(version: i32, source: anyhow::Error) -> Self {
        PreferenceError::Migration { version, source }
    }
}
