// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory document engine for desktop/CI builds.
//
// Documents keep their metadata behind a mutex and "persist" by appending a
// snapshot to a save log. Asynchronous saves run on a dedicated worker thread.
// The engine checks save configurations the way a native engine would reject
// them, so facade error paths can be exercised without an SDK.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use folio_core::error::EngineError;
use folio_core::{Annotation, DataProviderRef, FileIndex, RenderOptions, RenderScope, SaveConfig};

use crate::traits::{DocumentEngine, EngineDocument, SaveCallback};

/// One completed save as recorded by the in-memory engine.
#[derive(Debug, Clone)]
pub struct SavedSnapshot {
    pub config: SaveConfig,
    pub saved_at: DateTime<Utc>,
    pub title: String,
    /// Annotations written by this save.
    pub annotations: Vec<Annotation>,
}

#[derive(Debug)]
struct DocumentState {
    uid: String,
    title: String,
    annotations_enabled: bool,
    render_options: HashMap<RenderScope, RenderOptions>,
    data_providers: Vec<DataProviderRef>,
    checkpoint_exists: bool,
    pending_annotations: Vec<Annotation>,
    saves: Vec<SavedSnapshot>,
    fail_next_save: Option<EngineError>,
}

fn lock(state: &Mutex<DocumentState>) -> MutexGuard<'_, DocumentState> {
    // A panic in another holder leaves plain data behind; keep going.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reject configurations a real engine would refuse.
fn validate(config: &SaveConfig) -> Result<(), EngineError> {
    if let Some(security) = config.security_options() {
        if security.key_length == 0 || security.key_length % 8 != 0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "key length {} is not a positive multiple of 8",
                security.key_length
            )));
        }
        if security.owner_password.as_deref() == Some("") {
            return Err(EngineError::InvalidConfiguration(
                "owner password must not be empty".into(),
            ));
        }
    }
    Ok(())
}

/// Run one save against the shared state and return the annotations it wrote.
fn persist(
    state: &Mutex<DocumentState>,
    config: &SaveConfig,
) -> Result<Vec<Annotation>, EngineError> {
    let mut state = lock(state);

    if let Some(err) = state.fail_next_save.take() {
        warn!(uid = %state.uid, error = %err, "injected save failure");
        return Err(err);
    }
    validate(config)?;

    let annotations = std::mem::take(&mut state.pending_annotations);
    let snapshot = SavedSnapshot {
        config: config.clone(),
        saved_at: Utc::now(),
        title: state.title.clone(),
        annotations: annotations.clone(),
    };
    state.saves.push(snapshot);
    state.checkpoint_exists = true;

    debug!(
        uid = %state.uid,
        annotations = annotations.len(),
        force_rewrite = config.force_rewrite(),
        encrypted = config.security_options().is_some(),
        "document persisted"
    );
    Ok(annotations)
}

/// Document handle produced by [`MemoryEngine`].
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    state: Arc<Mutex<DocumentState>>,
}

impl MemoryDocument {
    fn new(data_providers: Vec<DataProviderRef>, load_checkpoint_if_available: bool) -> Self {
        let state = DocumentState {
            uid: Uuid::new_v4().to_string(),
            title: String::new(),
            annotations_enabled: true,
            render_options: HashMap::new(),
            data_providers,
            // Every requested checkpoint counts as available in memory.
            checkpoint_exists: load_checkpoint_if_available,
            pending_annotations: Vec::new(),
            saves: Vec::new(),
            fail_next_save: None,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Queue an annotation change to be written by the next save.
    pub fn add_annotation(&self, annotation: Annotation) {
        lock(&self.state).pending_annotations.push(annotation);
    }

    /// Make the next save fail with `error`.
    pub fn fail_next_save(&self, error: EngineError) {
        lock(&self.state).fail_next_save = Some(error);
    }

    /// Every save completed so far, oldest first.
    pub fn saves(&self) -> Vec<SavedSnapshot> {
        lock(&self.state).saves.clone()
    }

    pub fn save_count(&self) -> usize {
        lock(&self.state).saves.len()
    }

    pub fn last_save_config(&self) -> Option<SaveConfig> {
        lock(&self.state).saves.last().map(|snapshot| snapshot.config.clone())
    }
}

impl EngineDocument for MemoryDocument {
    #[instrument(skip_all, fields(keys = config.len()))]
    fn save(&self, config: &SaveConfig) -> Result<(), EngineError> {
        persist(&self.state, config).map(|_| ())
    }

    fn save_async(&self, config: SaveConfig, callback: SaveCallback) {
        let state = Arc::clone(&self.state);
        let spawned = std::thread::Builder::new()
            .name("folio-save".into())
            .spawn(move || {
                let outcome = persist(&state, &config);
                callback(outcome);
            });

        // The callback went down with the closure; the facade reports it.
        if let Err(err) = spawned {
            warn!(error = %err, "failed to start save worker");
        }
    }

    fn title(&self) -> String {
        lock(&self.state).title.clone()
    }

    fn set_title(&self, title: String) {
        lock(&self.state).title = title;
    }

    fn uid(&self) -> String {
        lock(&self.state).uid.clone()
    }

    fn set_uid(&self, uid: String) {
        lock(&self.state).uid = uid;
    }

    fn annotations_enabled(&self) -> bool {
        lock(&self.state).annotations_enabled
    }

    fn set_annotations_enabled(&self, enabled: bool) {
        lock(&self.state).annotations_enabled = enabled;
    }

    fn render_options(&self, scope: RenderScope) -> Option<RenderOptions> {
        lock(&self.state).render_options.get(&scope).cloned()
    }

    fn set_render_options(&self, scope: RenderScope, options: Option<RenderOptions>) {
        let mut state = lock(&self.state);
        match options {
            Some(options) => {
                state.render_options.insert(scope, options);
            }
            None => {
                state.render_options.remove(&scope);
            }
        }
    }

    fn checkpoint_exists(&self) -> bool {
        lock(&self.state).checkpoint_exists
    }

    fn data_providers(&self) -> Option<Vec<DataProviderRef>> {
        let state = lock(&self.state);
        if state.data_providers.is_empty() {
            None
        } else {
            Some(state.data_providers.clone())
        }
    }

    fn file_name(&self, index: FileIndex) -> Option<String> {
        lock(&self.state)
            .data_providers
            .get(index)
            .map(DataProviderRef::file_name)
    }
}

/// Engine that keeps every document in process memory.
///
/// The engine only tracks its documents weakly. Once every handle to a
/// document is dropped, its state and save log are freed.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    documents: Mutex<Vec<Weak<Mutex<DocumentState>>>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live documents, in opening order. Released entries are pruned.
    pub fn documents(&self) -> Vec<MemoryDocument> {
        let mut registry = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        registry.retain(|state| state.strong_count() > 0);
        registry
            .iter()
            .filter_map(Weak::upgrade)
            .map(|state| MemoryDocument { state })
            .collect()
    }

    /// The most recently opened document that is still alive.
    pub fn last_document(&self) -> Option<MemoryDocument> {
        self.documents().pop()
    }
}

impl DocumentEngine for MemoryEngine {
    fn engine_name(&self) -> &str {
        "memory"
    }

    #[instrument(skip(self, data_providers), fields(providers = data_providers.len()))]
    fn open(
        &self,
        data_providers: Vec<DataProviderRef>,
        load_checkpoint_if_available: bool,
    ) -> Arc<dyn EngineDocument> {
        let document = MemoryDocument::new(data_providers, load_checkpoint_if_available);
        info!(uid = %document.uid(), "memory document opened");

        let mut registry = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        registry.retain(|state| state.strong_count() > 0);
        registry.push(Arc::downgrade(&document.state));
        drop(registry);

        Arc::new(document)
    }
}
