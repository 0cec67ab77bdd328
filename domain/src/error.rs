//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure with
/// `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums. The `source` field holds the original error, if any, so that the
/// cause survives translation between layers.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// The caller handed over data that contradicts itself.
    Invalid,
    Serialization,
}

/// Enum representing failures of collaborators outside this process
/// (push proxy, email transport).
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Delivery,
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Error {
            source: Some(message.into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Invalid),
        }
    }

    /// Shorthand for a delivery failure reported by a notification collaborator.
    pub fn delivery(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Error {
            source: Some(message.into()),
            error_kind: DomainErrorKind::External(ExternalErrorKind::Delivery),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "Domain Error: {:?} ({source})", self.error_kind),
            None => write!(f, "Domain Error: {:?}", self.error_kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Serialization),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_error_keeps_message_as_source() {
        let err = Error::delivery("push proxy returned 503");

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Delivery)
        );
        assert!(err.to_string().contains("push proxy returned 503"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_serde_error_translates_to_serialization_kind() {
        let serde_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = serde_err.into();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Serialization)
        );
    }
}
