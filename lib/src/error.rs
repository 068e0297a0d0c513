use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NomenError {
    #[error("secure random source unavailable: {0}")]
    EntropyUnavailable(#[from] rand::Error),
    #[error("failed to find an unused name after {attempts} attempts ({used} of {capacity} names taken)")]
    NameSpaceExhausted {
        attempts: usize,
        used: usize,
        capacity: usize,
    },
    #[error("word list `{0}` is empty")]
    EmptyWordList(&'static str),
    #[error("name source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("store error: {0}")]
    StoreIo(#[from] redb::Error),
    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: &'static str, after: Duration },
    #[error("worker task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
    #[error("export failed: {0}")]
    ExportIo(#[source] std::io::Error),
    #[error("export encoding failed: {0}")]
    ExportJson(#[from] serde_json::Error),
}

impl NomenError {
    /// Whether the error ends the whole run rather than a single pairing.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            NomenError::NameSpaceExhausted { .. } | NomenError::EmptyWordList(_)
        )
    }
}

// redb reports each stage of a transaction with its own error type
macro_rules! store_error {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for NomenError {
                fn from(err: $ty) -> Self {
                    NomenError::StoreIo(err.into())
                }
            }
        )+
    };
}

store_error!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError
);

impl From<reqwest::Error> for NomenError {
    fn from(err: reqwest::Error) -> Self {
        NomenError::SourceUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NomenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exhaustion_and_empty_lists_are_fatal() {
        let exhausted = NomenError::NameSpaceExhausted {
            attempts: 1000,
            used: 4,
            capacity: 4,
        };
        assert!(exhausted.is_fatal());
        assert!(NomenError::EmptyWordList("nouns").is_fatal());

        let timeout = NomenError::Timeout {
            stage: "key generation",
            after: Duration::from_millis(5),
        };
        assert!(!timeout.is_fatal());
        assert!(!NomenError::SourceUnavailable("refused".into()).is_fatal());
    }

    #[test]
    fn exhaustion_message_reports_occupancy() {
        let err = NomenError::NameSpaceExhausted {
            attempts: 1000,
            used: 4,
            capacity: 4,
        };
        assert_eq!(
            err.to_string(),
            "failed to find an unused name after 1000 attempts (4 of 4 names taken)"
        );
    }
}
