pub type StoreResult<T> = Result<T, StoreError>;

/// Failures a store operation can surface. Expected outcomes (not found,
/// already exists, nothing deleted) are plain return values, not errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A field exceeded the configured column width. Rejected before any
    /// storage access.
    #[error("{field} is too long ({len} > {limit} characters)")]
    Validation {
        field: &'static str,
        len: usize,
        limit: usize,
    },

    /// The configured table name contains characters we refuse to splice
    /// into SQL.
    #[error("invalid table name {0:?}")]
    InvalidTable(String),

    /// The database could not be reached, or a statement failed after the
    /// one transparent reconnect attempt.
    #[error("quote database unavailable")]
    Unavailable(#[source] sqlx::Error),
}

impl StoreError {
    /// Whether the underlying sqlx error means the connection itself went
    /// away, as opposed to the server rejecting the statement.
    pub(crate) fn is_connection_error(err: &sqlx::Error) -> bool {
        matches!(
            err,
            sqlx::Error::Io(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::Protocol(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_connection_errors() {
        assert!(StoreError::is_connection_error(&sqlx::Error::PoolClosed));
        assert!(StoreError::is_connection_error(&sqlx::Error::PoolTimedOut));
        assert!(StoreError::is_connection_error(&sqlx::Error::Io(
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")
        )));
    }

    #[test]
    fn row_not_found_is_not_a_connection_error() {
        assert!(!StoreError::is_connection_error(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn validation_message_names_field_and_limit() {
        let err = StoreError::Validation {
            field: "key",
            len: 97,
            limit: 96,
        };
        assert_eq!(err.to_string(), "key is too long (97 > 96 characters)");
    }
}
