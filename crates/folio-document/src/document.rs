// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document facade — typed saves and record encoding over an engine document.
//
// The facade holds an engine handle by composition and exposes only the typed
// API: saves take `SaveOption` lists, completions run on an explicit callback
// context, and metadata travels through `DocumentRecord`.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, info, instrument, warn};

use folio_bridge::{DocumentEngine, EngineDocument, SaveOutcome};
use folio_core::error::{DecodeError, EngineError, Result};
use folio_core::{
    DataProviderRef, FacadeConfig, FileIndex, RenderOptions, RenderScope, SaveConfig, SaveOption,
};

use crate::dispatch::{CallbackContext, InlineContext};
use crate::record::DocumentRecord;

type Completion = Box<dyn FnOnce(SaveOutcome) + Send + 'static>;

/// Delivers a save outcome to its completion exactly once.
///
/// If the engine drops the guard without reporting, the completion still
/// runs with [`EngineError::CompletionDropped`].
struct CompletionGuard {
    completion: Option<Completion>,
    context: Arc<dyn CallbackContext>,
}

impl CompletionGuard {
    fn deliver(mut self, outcome: SaveOutcome) {
        if let Some(completion) = self.completion.take() {
            self.context.dispatch(Box::new(move || completion(outcome)));
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(completion) = self.completion.take() {
            warn!("engine released save callback without a result");
            self.context
                .dispatch(Box::new(move || completion(Err(EngineError::CompletionDropped))));
        }
    }
}

/// A PDF document reached through an opaque engine.
pub struct Document {
    engine_document: Arc<dyn EngineDocument>,
    callback_context: Arc<dyn CallbackContext>,
    default_save_options: Vec<SaveOption>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("uid", &self.engine_document.uid())
            .field("callback_context", &self.callback_context.name())
            .field("default_save_options", &self.default_save_options)
            .finish()
    }
}

impl Document {
    // -- Construction ---------------------------------------------------------

    /// Create a document over `data_providers`. Nothing is validated here.
    ///
    /// Completions run on [`InlineContext`] until
    /// [`Document::with_callback_context`] installs another context.
    #[instrument(skip_all, fields(engine = engine.engine_name(), providers = data_providers.len()))]
    pub fn create(
        engine: &dyn DocumentEngine,
        data_providers: Vec<DataProviderRef>,
        load_checkpoint_if_available: bool,
    ) -> Self {
        let engine_document = engine.open(data_providers, load_checkpoint_if_available);
        debug!(uid = %engine_document.uid(), load_checkpoint_if_available, "document created");

        Self {
            engine_document,
            callback_context: Arc::new(InlineContext),
            default_save_options: Vec::new(),
        }
    }

    /// Create a document using the checkpoint flag and save defaults of `config`.
    pub fn open_with_config(
        engine: &dyn DocumentEngine,
        data_providers: Vec<DataProviderRef>,
        config: &FacadeConfig,
    ) -> Self {
        Self::create(engine, data_providers, config.load_checkpoint_if_available).with_config(config)
    }

    /// Apply the save defaults of `config`.
    pub fn with_config(mut self, config: &FacadeConfig) -> Self {
        self.default_save_options = config.default_save_options.clone();
        self
    }

    /// Run asynchronous save completions on `context`.
    pub fn with_callback_context(mut self, context: Arc<dyn CallbackContext>) -> Self {
        self.callback_context = context;
        self
    }

    // -- Saving ---------------------------------------------------------------

    /// Merge the configured defaults and `options` into one engine record.
    fn merged_config(&self, options: &[SaveOption]) -> SaveConfig {
        let config = SaveConfig::from_options(self.default_save_options.iter().chain(options));
        debug!(
            keys = ?config.keys().map(|key| key.as_str()).collect::<Vec<_>>(),
            "save options merged"
        );
        config
    }

    /// Save the document and its linked data (bookmarks, annotations),
    /// blocking until the engine finishes.
    ///
    /// Engine failures are returned unchanged.
    #[instrument(skip_all, fields(uid = %self.engine_document.uid(), options = options.len()))]
    pub fn save(&self, options: &[SaveOption]) -> std::result::Result<(), EngineError> {
        let config = self.merged_config(options);
        self.engine_document.save(&config)?;
        info!("document saved");
        Ok(())
    }

    /// Save without blocking the calling thread.
    ///
    /// `completion` runs exactly once on this document's callback context,
    /// with the annotations the engine touched or the engine's error.
    ///
    /// The default context is [`InlineContext`], which runs `completion` on
    /// the engine's worker thread. Hosts with a UI/main thread must install a
    /// [`MainContext`](crate::dispatch::MainContext) through
    /// [`Document::with_callback_context`] and drive its `MainLoop`.
    #[instrument(skip_all, fields(uid = %self.engine_document.uid(), options = options.len()))]
    pub fn save_with_completion<F>(&self, options: &[SaveOption], completion: F)
    where
        F: FnOnce(SaveOutcome) + Send + 'static,
    {
        let config = self.merged_config(options);
        let guard = CompletionGuard {
            completion: Some(Box::new(completion)),
            context: Arc::clone(&self.callback_context),
        };

        self.engine_document
            .save_async(config, Box::new(move |outcome| guard.deliver(outcome)));
        debug!(context = self.callback_context.name(), "async save started");
    }

    /// Awaitable form of [`Document::save_with_completion`].
    ///
    /// With a main-thread context the paired `MainLoop` must be driven for
    /// this future to resolve.
    pub async fn save_async(&self, options: &[SaveOption]) -> SaveOutcome {
        let (tx, rx) = oneshot::channel();
        self.save_with_completion(options, move |outcome| {
            let _ = tx.send(outcome);
        });
        rx.await.unwrap_or(Err(EngineError::CompletionDropped))
    }

    /// Dictionary-based save. Not supported: use the typed [`SaveOption`] API.
    ///
    /// # Panics
    ///
    /// Always. Reaching this is a programming error.
    #[deprecated(note = "use `save` or `save_with_completion` with typed `SaveOption`s")]
    pub fn save_with_dictionary(
        &self,
        _options: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> ! {
        panic!("dictionary-based save is disabled; use typed SaveOption values")
    }

    // -- Accessors ------------------------------------------------------------

    pub fn title(&self) -> String {
        self.engine_document.title()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.engine_document.set_title(title.into());
    }

    pub fn uid(&self) -> String {
        self.engine_document.uid()
    }

    pub fn set_uid(&self, uid: impl Into<String>) {
        self.engine_document.set_uid(uid.into());
    }

    pub fn annotations_enabled(&self) -> bool {
        self.engine_document.annotations_enabled()
    }

    pub fn set_annotations_enabled(&self, enabled: bool) {
        self.engine_document.set_annotations_enabled(enabled);
    }

    pub fn render_options(&self, scope: RenderScope) -> Option<RenderOptions> {
        self.engine_document.render_options(scope)
    }

    pub fn set_render_options(&self, scope: RenderScope, options: Option<RenderOptions>) {
        self.engine_document.set_render_options(scope, options);
    }

    pub fn checkpoint_exists(&self) -> bool {
        self.engine_document.checkpoint_exists()
    }

    pub fn data_providers(&self) -> Option<Vec<DataProviderRef>> {
        self.engine_document.data_providers()
    }

    /// File name of the data provider at `file_index`.
    pub fn file_name(&self, file_index: FileIndex) -> Option<String> {
        self.engine_document.file_name(file_index)
    }

    // -- Encoding -------------------------------------------------------------

    /// Capture this document's metadata as a record.
    pub fn encode(&self) -> DocumentRecord {
        let doc = &self.engine_document;
        DocumentRecord {
            uid: doc.uid(),
            title: doc.title(),
            are_annotations_enabled: doc.annotations_enabled(),
            data_providers: doc.data_providers(),
            should_load_checkpoint: doc.checkpoint_exists(),
            render_options_for_all: doc.render_options(RenderScope::All),
            render_options_for_page: doc.render_options(RenderScope::Page),
            render_options_for_processor: doc.render_options(RenderScope::Processor),
            version: DocumentRecord::VERSION,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(self.encode().to_json()?)
    }

    /// Rebuild a document from `record` on `engine`.
    ///
    /// Fails without opening anything when the record version is unsupported.
    #[instrument(skip_all, fields(uid = %record.uid))]
    pub fn decode(
        engine: &dyn DocumentEngine,
        record: &DocumentRecord,
    ) -> std::result::Result<Self, DecodeError> {
        record.validate()?;

        let document = Self::create(
            engine,
            record.data_providers.clone().unwrap_or_default(),
            record.should_load_checkpoint,
        );

        let doc = &document.engine_document;
        doc.set_title(record.title.clone());
        doc.set_annotations_enabled(record.are_annotations_enabled);
        doc.set_uid(record.uid.clone());
        doc.set_render_options(RenderScope::All, record.render_options_for_all.clone());
        doc.set_render_options(RenderScope::Page, record.render_options_for_page.clone());
        doc.set_render_options(
            RenderScope::Processor,
            record.render_options_for_processor.clone(),
        );

        debug!("document decoded");
        Ok(document)
    }

    /// Parse a JSON record and rebuild the document it describes.
    pub fn from_json(
        engine: &dyn DocumentEngine,
        text: &str,
    ) -> std::result::Result<Self, DecodeError> {
        Self::from_json_with_config(engine, text, &FacadeConfig::default())
    }

    /// As [`Document::from_json`], honouring `config` for versioning and
    /// save defaults.
    pub fn from_json_with_config(
        engine: &dyn DocumentEngine,
        text: &str,
        config: &FacadeConfig,
    ) -> std::result::Result<Self, DecodeError> {
        let record = DocumentRecord::from_json(text, config.accept_unversioned_records)?;
        Ok(Self::decode(engine, &record)?.with_config(config))
    }
}
