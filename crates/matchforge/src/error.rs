//! Unified error type for Matchforge.

use matchforge_pool::PoolError;
use matchforge_protocol::ProtocolError;
use matchforge_room::RoomError;

/// Top-level error that wraps all crate-specific errors.
///
/// `#[from]` on each variant lets `?` lift sub-crate errors directly.
#[derive(Debug, thiserror::Error)]
pub enum MatchforgeError {
    /// Malformed input (empty player id).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Player registry outcome (unknown id, duplicate join).
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Room registry fault (id collision).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// Binding or serving the HTTP listener failed.
    #[error("server i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// The caller-facing classification of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    /// Anything the caller could not have caused.
    Internal,
}

impl MatchforgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Protocol(ProtocolError::EmptyPlayerId) => ErrorKind::InvalidArgument,
            Self::Pool(PoolError::NotFound(_)) => ErrorKind::NotFound,
            Self::Pool(PoolError::AlreadyExists(_)) => ErrorKind::AlreadyExists,
            Self::Pool(PoolError::SlotAlreadyFilled(_)) | Self::Room(_) | Self::Io(_) => {
                ErrorKind::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use matchforge_protocol::{PlayerId, RoomId};

    use super::*;

    fn pid(raw: &str) -> PlayerId {
        PlayerId::new(raw).unwrap()
    }

    #[test]
    fn test_from_protocol_error_is_invalid_argument() {
        let err: MatchforgeError = ProtocolError::EmptyPlayerId.into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "player id is required");
    }

    #[test]
    fn test_from_pool_error_kinds() {
        let not_found: MatchforgeError = PoolError::NotFound(pid("A")).into();
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert!(not_found.to_string().contains("A"));

        let exists: MatchforgeError = PoolError::AlreadyExists(pid("A")).into();
        assert_eq!(exists.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_from_room_error_is_internal() {
        let err: MatchforgeError = RoomError::DuplicateId(RoomId::new_v4()).into();
        assert!(matches!(err, MatchforgeError::Room(_)));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
