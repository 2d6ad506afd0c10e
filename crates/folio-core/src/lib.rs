// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — Core types, save options, errors and configuration shared across all crates.

pub mod config;
pub mod error;
pub mod save;
pub mod types;

pub use config::FacadeConfig;
pub use error::{DecodeError, EngineError, FolioError};
pub use save::*;
pub use types::*;
