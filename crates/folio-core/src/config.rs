// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Facade configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{FolioError, Result};
use crate::save::SaveOption;

/// Persistent facade settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacadeConfig {
    /// Options merged ahead of the caller's options on every save.
    pub default_save_options: Vec<SaveOption>,
    /// Checkpoint flag used when a document is opened without an explicit one.
    pub load_checkpoint_if_available: bool,
    /// Accept records written before the `version` field existed.
    pub accept_unversioned_records: bool,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            default_save_options: Vec::new(),
            load_checkpoint_if_available: true,
            accept_unversioned_records: true,
        }
    }
}

impl FacadeConfig {
    /// Read a configuration file written by [`FacadeConfig::save`].
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| FolioError::Config(format!("{}: {e}", path.as_ref().display())))?;
        debug!(defaults = config.default_save_options.len(), "facade config loaded");
        Ok(config)
    }

    /// Write this configuration as pretty-printed JSON.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), text)?;
        debug!("facade config written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::{EncryptionAlgorithm, SecurityOptions};

    #[test]
    fn defaults_load_checkpoints_and_accept_old_records() {
        let config = FacadeConfig::default();
        assert!(config.default_save_options.is_empty());
        assert!(config.load_checkpoint_if_available);
        assert!(config.accept_unversioned_records);
    }

    #[test]
    fn config_survives_a_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.json");

        let config = FacadeConfig {
            default_save_options: vec![
                SaveOption::ForceRewrite,
                SaveOption::Security(SecurityOptions::new(128, EncryptionAlgorithm::Aes)),
            ],
            load_checkpoint_if_available: false,
            accept_unversioned_records: false,
        };
        config.save(&path).unwrap();

        assert_eq!(FacadeConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{"load_checkpoint_if_available": false}"#).unwrap();

        let config = FacadeConfig::load(&path).unwrap();
        assert!(!config.load_checkpoint_if_available);
        assert!(config.accept_unversioned_records);
    }

    #[test]
    fn garbage_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(FacadeConfig::load(&path), Err(FolioError::Config(_))));
    }
}
