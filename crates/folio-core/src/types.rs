// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types shared by the facade and the engine bridge.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Index of a data provider within a document.
pub type FileIndex = usize;

/// Which rendering context a set of render options applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderScope {
    /// Every render request.
    All,
    /// On-screen page rendering.
    Page,
    /// Rendering done while processing (export, print, flatten).
    Processor,
}

impl RenderScope {
    pub const ALL: [RenderScope; 3] = [RenderScope::All, RenderScope::Page, RenderScope::Processor];
}

impl std::fmt::Display for RenderScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderScope::All => write!(f, "all"),
            RenderScope::Page => write!(f, "page"),
            RenderScope::Processor => write!(f, "processor"),
        }
    }
}

/// Render setting understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderOptionKey {
    PreserveAspectRatio,
    IgnoreDisplaySettings,
    PageColor,
    InvertRendering,
    Filters,
    InterpolationQuality,
    SkipPageContent,
    OverlayAnnotations,
    SkipAnnotations,
    IgnorePageClip,
    AllowAntiAliasing,
    BackgroundFill,
    InteractiveFormFillColor,
    DrawSignHereOverlay,
    DrawRedactionsAsRedacted,
}

/// Render settings for one scope. Values are opaque to Folio.
pub type RenderOptions = BTreeMap<RenderOptionKey, serde_json::Value>;

/// Engine-specific description of a source of document bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataProviderRef {
    File { path: PathBuf },
    Memory { uid: String, length: u64 },
    Stream { identifier: String },
}

impl DataProviderRef {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        DataProviderRef::File { path: path.into() }
    }

    /// Display name the engine reports for this provider.
    pub fn file_name(&self) -> String {
        match self {
            DataProviderRef::File { path } => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            DataProviderRef::Memory { uid, .. } => uid.clone(),
            DataProviderRef::Stream { identifier } => identifier.clone(),
        }
    }
}

/// Kind of an engine annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationKind {
    Note,
    Highlight,
    Ink,
    FreeText,
    Link,
    Stamp,
    Widget,
}

/// Annotation reported by the engine as affected by a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: Uuid,
    pub page_index: u32,
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn new(page_index: u32, kind: AnnotationKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            page_index,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_provider_reports_its_file_name() {
        let provider = DataProviderRef::file("/tmp/reports/q3.pdf");
        assert_eq!(provider.file_name(), "q3.pdf");
    }

    #[test]
    fn memory_provider_reports_its_uid() {
        let provider = DataProviderRef::Memory {
            uid: "scratch".into(),
            length: 12,
        };
        assert_eq!(provider.file_name(), "scratch");
    }

    #[test]
    fn data_provider_is_tagged_by_kind() {
        let json = serde_json::to_value(DataProviderRef::Stream {
            identifier: "camera".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"kind": "stream", "identifier": "camera"}));
    }

    #[test]
    fn render_option_keys_are_camel_case() {
        let mut options = RenderOptions::new();
        options.insert(RenderOptionKey::InvertRendering, serde_json::json!(true));
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json, serde_json::json!({"invertRendering": true}));
    }
}
