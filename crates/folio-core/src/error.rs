// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use thiserror::Error;

/// Failure reported by the document engine.
///
/// The facade never rewrites or retries these; they reach the caller exactly
/// as the engine produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid save configuration: {0}")]
    InvalidConfiguration(String),

    #[error("engine I/O failure: {0}")]
    Io(String),

    #[error("{domain} error {code}: {message}")]
    Native {
        domain: String,
        code: i64,
        message: String,
    },

    /// The engine released an async save callback without ever calling it.
    #[error("engine dropped the save completion without reporting a result")]
    CompletionDropped,
}

/// Malformed serialized document record.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("unsupported record version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Top-level error type for all Folio operations.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
