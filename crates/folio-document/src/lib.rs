// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document — Document facade for the Folio engine bridge.
//
// Provides the `Document` type (typed synchronous and asynchronous saves),
// the serialized `DocumentRecord`, and the callback contexts that decide where
// asynchronous save completions run.

pub mod dispatch;
pub mod document;
pub mod record;

// Re-export the primary types so callers can use `folio_document::Document` etc.
pub use dispatch::{CallbackContext, InlineContext, MainContext, MainLoop, main_context};
pub use document::Document;
pub use record::DocumentRecord;
