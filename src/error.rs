//! Error type shared by the host, template and composite services.

use thiserror::Error;

/// Failure raised by a language service call.
///
/// The decoration layer never catches these: an error from the host or from the
/// template-aware handler propagates to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("document '{0}' is not open")]
    UnknownDocument(String),

    #[error("offset {offset} is outside document '{file_name}' (length {length})")]
    OffsetOutOfRange {
        file_name: String,
        offset: usize,
        length: usize,
    },

    #[error("offset {offset} splits a character in document '{file_name}'")]
    InsideCharacter { file_name: String, offset: usize },

    #[error("host service failed: {0}")]
    Host(String),

    #[error("template service failed: {0}")]
    Template(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
