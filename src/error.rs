// src/error.rs
use std::io;
use thiserror::Error;

/// Coarse classification of a [`LensError`], used to decide whether a failure
/// aborts the analysis or degrades to an `error` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Format,
    Protocol,
    Schema,
    Io,
}

#[derive(Error, Debug)]
pub enum LensError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid magic at offset {offset}: expected {expected}, found {found}")]
    InvalidMagic {
        offset: u64,
        expected: String,
        found: String,
    },

    #[error("Truncated file at offset {offset}: need {needed} bytes, file is {file_length} bytes")]
    Truncated {
        offset: u64,
        needed: u64,
        file_length: u64,
    },

    #[error("Footer length {footer_length} at offset {offset} exceeds the {available} bytes available")]
    FooterTooLarge {
        offset: u64,
        footer_length: u64,
        available: u64,
    },

    #[error("Protocol error at offset {offset}: {message}")]
    Protocol { offset: u64, message: String },

    #[error("Unknown struct in schema tables: {0}")]
    UnknownStruct(String),

    #[error("Analysis task failed: {0}")]
    TaskFailed(String),
}

impl LensError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LensError::Io(_) | LensError::TaskFailed(_) => ErrorCategory::Io,
            LensError::InvalidMagic { .. }
            | LensError::Truncated { .. }
            | LensError::FooterTooLarge { .. } => ErrorCategory::Format,
            LensError::Protocol { .. } => ErrorCategory::Protocol,
            LensError::UnknownStruct(_) => ErrorCategory::Schema,
        }
    }

    /// Byte offset the failure is attached to, when one is known.
    pub fn offset(&self) -> Option<u64> {
        match self {
            LensError::InvalidMagic { offset, .. }
            | LensError::Truncated { offset, .. }
            | LensError::FooterTooLarge { offset, .. }
            | LensError::Protocol { offset, .. } => Some(*offset),
            LensError::Io(_) | LensError::UnknownStruct(_) | LensError::TaskFailed(_) => None,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self.category(), ErrorCategory::Format | ErrorCategory::Io)
    }
}

pub type Result<T> = std::result::Result<T, LensError>;
