// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine interface traits.
//
// The engine owns all document state and serializes its own mutation, which
// is why every method takes `&self`. Saves only ever receive a typed
// `SaveConfig`; there is no dictionary-based entry point.

use std::sync::Arc;

use folio_core::error::EngineError;
use folio_core::{Annotation, DataProviderRef, FileIndex, RenderOptions, RenderScope, SaveConfig};

/// Result of an asynchronous save: the annotations the engine touched.
pub type SaveOutcome = Result<Vec<Annotation>, EngineError>;

/// Callback an engine calls once an asynchronous save has finished.
pub type SaveCallback = Box<dyn FnOnce(SaveOutcome) + Send + 'static>;

/// Factory for engine documents.
pub trait DocumentEngine: Send + Sync {
    /// Human-readable engine name (e.g. "memory", "native 13.2").
    fn engine_name(&self) -> &str;

    /// Create a document over the given data providers.
    fn open(
        &self,
        data_providers: Vec<DataProviderRef>,
        load_checkpoint_if_available: bool,
    ) -> Arc<dyn EngineDocument>;
}

/// Handle to one document living inside the engine.
pub trait EngineDocument: Send + Sync {
    /// Persist the document and its linked data, blocking the caller.
    fn save(&self, config: &SaveConfig) -> Result<(), EngineError>;

    /// Persist off the calling thread and report through `callback`.
    ///
    /// Implementations must call `callback` at most once. Dropping it
    /// unreported is tolerated by the facade but reported as an error.
    fn save_async(&self, config: SaveConfig, callback: SaveCallback);

    fn title(&self) -> String;
    fn set_title(&self, title: String);

    fn uid(&self) -> String;
    fn set_uid(&self, uid: String);

    fn annotations_enabled(&self) -> bool;
    fn set_annotations_enabled(&self, enabled: bool);

    fn render_options(&self, scope: RenderScope) -> Option<RenderOptions>;
    fn set_render_options(&self, scope: RenderScope, options: Option<RenderOptions>);

    /// Whether the engine holds checkpoint state for this document.
    fn checkpoint_exists(&self) -> bool;

    /// The providers the document was created from, `None` if it has none.
    fn data_providers(&self) -> Option<Vec<DataProviderRef>>;

    /// File name of the data provider at `index`.
    fn file_name(&self, index: FileIndex) -> Option<String>;
}
