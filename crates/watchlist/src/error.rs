use thiserror::Error;

use crate::engine::EngineError;

/// Errors from loading the latest watchlist record
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WatchlistError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("expected {expected} columns, row has {found}")]
    MalformedRow { expected: usize, found: usize },
}
