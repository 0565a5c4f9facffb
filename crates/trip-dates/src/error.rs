//! Error types for the free-text date grammar.
//!
//! These never escape the resolution API: the resolver maps every error to
//! the unresolved sentinel. They exist so the grammar can say *why* a
//! fragment was rejected (visible in logs and in unit tests).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateTextError {
    #[error("empty date text")]
    Empty,

    #[error("Unrecognized word: {0}")]
    UnknownWord(String),

    #[error("no month in '{0}'")]
    MissingMonth(String),

    #[error("no four-digit year in '{0}'")]
    MissingYear(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("unexpected trailing input: {0}")]
    TrailingInput(String),
}

pub type Result<T> = std::result::Result<T, DateTextError>;
