// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — Document engine bridge.
//
// Defines the narrow interface through which the facade reaches the PDF
// document engine. Native hosts implement `DocumentEngine` over their SDK;
// desktop and CI builds use the in-memory engine in `memory`.

pub mod memory;
pub mod traits;

use std::sync::Arc;

pub use memory::{MemoryDocument, MemoryEngine, SavedSnapshot};
pub use traits::{DocumentEngine, EngineDocument, SaveCallback, SaveOutcome};

/// Engine used when the host does not inject one.
pub fn default_engine() -> Arc<dyn DocumentEngine> {
    Arc::new(MemoryEngine::new())
}
