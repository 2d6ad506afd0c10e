// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Serialized document record.
//
// A record carries document metadata only, never content. Field order on the
// wire is fixed by the struct layout below. Decoding walks the fields by hand
// so a missing or mistyped field is reported by name.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use folio_core::error::DecodeError;
use folio_core::{DataProviderRef, RenderOptions};

/// Persisted metadata of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub uid: String,
    pub title: String,
    pub are_annotations_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_providers: Option<Vec<DataProviderRef>>,
    pub should_load_checkpoint: bool,
    pub render_options_for_all: Option<RenderOptions>,
    pub render_options_for_page: Option<RenderOptions>,
    pub render_options_for_processor: Option<RenderOptions>,
    pub version: u32,
}

fn required<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    field: &'static str,
) -> Result<T, DecodeError> {
    let value = map.remove(field).ok_or(DecodeError::MissingField(field))?;
    serde_json::from_value(value).map_err(|e| DecodeError::InvalidField {
        field,
        reason: e.to_string(),
    })
}

// Absent and null both mean "not set".
fn optional<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Option<T>, DecodeError> {
    match map.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| DecodeError::InvalidField {
                field,
                reason: e.to_string(),
            }),
    }
}

fn check_version(version: u32) -> Result<(), DecodeError> {
    if version == 0 || version > DocumentRecord::VERSION {
        return Err(DecodeError::UnsupportedVersion {
            found: version,
            supported: DocumentRecord::VERSION,
        });
    }
    Ok(())
}

impl DocumentRecord {
    /// Newest record layout this build writes and reads.
    pub const VERSION: u32 = 1;

    /// Parse a record from JSON text.
    pub fn from_json(text: &str, accept_unversioned: bool) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value, accept_unversioned)
    }

    /// Decode a record from an already parsed JSON value.
    ///
    /// `dataProviders` may be absent. Every other field must be present;
    /// the render option fields may be `null`.
    pub fn from_value(value: Value, accept_unversioned: bool) -> Result<Self, DecodeError> {
        let Value::Object(mut map) = value else {
            return Err(DecodeError::NotAnObject);
        };

        let version = match optional::<u32>(&mut map, "version")? {
            Some(version) => version,
            None if accept_unversioned => Self::VERSION,
            None => return Err(DecodeError::MissingField("version")),
        };
        check_version(version)?;

        // Construction inputs first, then the applied metadata.
        // An empty provider list is written back as an absent one.
        let data_providers = optional::<Vec<DataProviderRef>>(&mut map, "dataProviders")?
            .filter(|providers| !providers.is_empty());
        let should_load_checkpoint = required(&mut map, "shouldLoadCheckpoint")?;
        let title = required(&mut map, "title")?;
        let are_annotations_enabled = required(&mut map, "areAnnotationsEnabled")?;
        let uid = required(&mut map, "uid")?;
        let render_options_for_all = required(&mut map, "renderOptionsForAll")?;
        let render_options_for_page = required(&mut map, "renderOptionsForPage")?;
        let render_options_for_processor = required(&mut map, "renderOptionsForProcessor")?;

        if !map.is_empty() {
            debug!(ignored = ?map.keys().collect::<Vec<_>>(), "unknown record fields ignored");
        }

        Ok(Self {
            uid,
            title,
            are_annotations_enabled,
            data_providers,
            should_load_checkpoint,
            render_options_for_all,
            render_options_for_page,
            render_options_for_processor,
            version,
        })
    }

    /// Reject records whose layout version this build cannot read.
    pub fn validate(&self) -> Result<(), DecodeError> {
        check_version(self.version)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
