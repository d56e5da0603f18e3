use thiserror::Error;

use crate::model::DeclId;

pub type ProcessingResult<T> = Result<T, ProcessingError>;

pub type CodegenResult<T> = Result<T, CodegenError>;

/// Why a unit could not be generated.
#[derive(Error, Debug, Clone)]
pub enum ProcessingError {
    /// A declaration breaks one of the structural rules. `member` names the
    /// offending property when there is one.
    #[error("{message}")]
    Declaration {
        declaration: DeclId,
        member: Option<syn::Ident>,
        message: String,
    },
    #[error("internal generator failure: {0}")]
    Internal(String),
}

impl ProcessingError {
    pub fn at(declaration: DeclId, message: impl Into<String>) -> Self {
        ProcessingError::Declaration {
            declaration,
            member: None,
            message: message.into(),
        }
    }

    pub fn at_member(declaration: DeclId, member: &syn::Ident, message: impl Into<String>) -> Self {
        ProcessingError::Declaration {
            declaration,
            member: Some(member.clone()),
            message: message.into(),
        }
    }

    pub fn declaration(&self) -> Option<DeclId> {
        match self {
            ProcessingError::Declaration { declaration, .. } => Some(*declaration),
            ProcessingError::Internal(_) => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ProcessingError::Declaration { message, .. } => message.clone(),
            ProcessingError::Internal(message) => message.clone(),
        }
    }
}

/// Failures outside of validation: loading manifests and writing output.
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest: {0}")]
    Manifest(#[from] toml::de::Error),
    #[error("invalid {what} `{source_text}` in manifest: {message}")]
    Syntax {
        what: &'static str,
        source_text: String,
        message: String,
    },
    #[error("{0}")]
    Configuration(String),
}
