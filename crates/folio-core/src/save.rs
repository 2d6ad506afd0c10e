// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed save options and the flat configuration record handed to the engine.
//
// Callers describe a save with a list of `SaveOption` values. Each option
// expands into one or more key/value entries; `SaveConfig` folds the entries
// of every option together, later options overwriting earlier ones.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Operations a user may perform on an encrypted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentPermission {
    Printing,
    Modification,
    Extract,
    AnnotationsAndForms,
    FillForms,
    ExtractAccessibility,
    Assemble,
    PrintHighQuality,
}

/// Cipher used when the engine encrypts the saved document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EncryptionAlgorithm {
    Rc4,
    Aes,
}

/// Password and permission settings for an encrypted save.
///
/// Nothing is validated here. Whether a key length suits the algorithm is
/// for the engine to decide.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityOptions {
    pub owner_password: Option<String>,
    pub user_password: Option<String>,
    /// Key length in bits.
    pub key_length: u32,
    pub permissions: BTreeSet<DocumentPermission>,
    pub encryption_algorithm: EncryptionAlgorithm,
}

impl SecurityOptions {
    pub fn new(key_length: u32, encryption_algorithm: EncryptionAlgorithm) -> Self {
        Self {
            owner_password: None,
            user_password: None,
            key_length,
            permissions: BTreeSet::new(),
            encryption_algorithm,
        }
    }

    pub fn with_owner_password(mut self, password: impl Into<String>) -> Self {
        self.owner_password = Some(password.into());
        self
    }

    pub fn with_user_password(mut self, password: impl Into<String>) -> Self {
        self.user_password = Some(password.into());
        self
    }

    pub fn with_permissions(
        mut self,
        permissions: impl IntoIterator<Item = DocumentPermission>,
    ) -> Self {
        self.permissions.extend(permissions);
        self
    }
}

// Passwords never end up in logs.
impl fmt::Debug for SecurityOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityOptions")
            .field("owner_password", &self.owner_password.as_ref().map(|_| "***"))
            .field("user_password", &self.user_password.as_ref().map(|_| "***"))
            .field("key_length", &self.key_length)
            .field("permissions", &self.permissions)
            .field("encryption_algorithm", &self.encryption_algorithm)
            .finish()
    }
}

/// One typed instruction for a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SaveOption {
    /// Encrypt the output with the given settings.
    Security(SecurityOptions),
    /// Write the whole file instead of appending an incremental update.
    ForceRewrite,
}

impl SaveOption {
    /// Expand this option into its configuration record entries.
    pub fn expand(&self) -> Vec<(SaveOptionKey, SaveOptionValue)> {
        match self {
            SaveOption::Security(options) => vec![(
                SaveOptionKey::SecurityOptions,
                SaveOptionValue::Security(options.clone()),
            )],
            SaveOption::ForceRewrite => {
                vec![(SaveOptionKey::ForceRewrite, SaveOptionValue::Flag(true))]
            }
        }
    }
}

/// Key of an entry in a [`SaveConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SaveOptionKey {
    SecurityOptions,
    ForceRewrite,
}

impl SaveOptionKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveOptionKey::SecurityOptions => "securityOptions",
            SaveOptionKey::ForceRewrite => "forceRewrite",
        }
    }
}

impl fmt::Display for SaveOptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of an entry in a [`SaveConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SaveOptionValue {
    Security(SecurityOptions),
    Flag(bool),
}

/// Flat configuration record consumed by the engine's save primitive.
///
/// Only constructible from typed options, so the engine never sees an
/// arbitrary dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SaveConfig {
    entries: BTreeMap<SaveOptionKey, SaveOptionValue>,
}

impl SaveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every option in order. On a key collision the later option wins.
    pub fn from_options<'a>(options: impl IntoIterator<Item = &'a SaveOption>) -> Self {
        let mut config = Self::new();
        for option in options {
            config.merge(option);
        }
        config
    }

    /// Fold one option's entries into this record, overwriting existing keys.
    pub fn merge(&mut self, option: &SaveOption) {
        for (key, value) in option.expand() {
            self.entries.insert(key, value);
        }
    }

    pub fn get(&self, key: SaveOptionKey) -> Option<&SaveOptionValue> {
        self.entries.get(&key)
    }

    pub fn security_options(&self) -> Option<&SecurityOptions> {
        match self.entries.get(&SaveOptionKey::SecurityOptions) {
            Some(SaveOptionValue::Security(options)) => Some(options),
            _ => None,
        }
    }

    pub fn force_rewrite(&self) -> bool {
        matches!(
            self.entries.get(&SaveOptionKey::ForceRewrite),
            Some(SaveOptionValue::Flag(true))
        )
    }

    pub fn keys(&self) -> impl Iterator<Item = SaveOptionKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_security() -> SecurityOptions {
        SecurityOptions::new(16, EncryptionAlgorithm::Aes)
            .with_owner_password("foo")
            .with_user_password("bar")
            .with_permissions([DocumentPermission::Extract, DocumentPermission::FillForms])
    }

    #[test]
    fn security_and_force_rewrite_merge_into_two_keys() {
        let opts = sample_security();
        let config =
            SaveConfig::from_options(&[SaveOption::Security(opts.clone()), SaveOption::ForceRewrite]);

        assert_eq!(config.len(), 2);
        assert_eq!(config.security_options(), Some(&opts));
        assert!(config.force_rewrite());
    }

    #[test]
    fn duplicate_force_rewrite_collapses() {
        let config = SaveConfig::from_options(&[SaveOption::ForceRewrite, SaveOption::ForceRewrite]);
        assert_eq!(config.keys().collect::<Vec<_>>(), vec![SaveOptionKey::ForceRewrite]);
    }

    #[test]
    fn later_security_option_wins() {
        let first = SecurityOptions::new(40, EncryptionAlgorithm::Rc4);
        let second = sample_security();
        let config = SaveConfig::from_options(&[
            SaveOption::Security(first),
            SaveOption::ForceRewrite,
            SaveOption::Security(second.clone()),
        ]);

        assert_eq!(config.len(), 2);
        assert_eq!(config.security_options(), Some(&second));
    }

    #[test]
    fn empty_options_give_empty_record() {
        let config = SaveConfig::from_options(&Vec::<SaveOption>::new());
        assert!(config.is_empty());
        assert!(!config.force_rewrite());
        assert!(config.security_options().is_none());
    }

    #[test]
    fn record_serializes_with_engine_key_names() {
        let config =
            SaveConfig::from_options(&[SaveOption::Security(sample_security()), SaveOption::ForceRewrite]);
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["forceRewrite"], serde_json::json!(true));
        assert_eq!(json["securityOptions"]["keyLength"], serde_json::json!(16));
        assert_eq!(
            json["securityOptions"]["permissions"],
            serde_json::json!(["extract", "fillForms"])
        );
        assert_eq!(json["securityOptions"]["encryptionAlgorithm"], serde_json::json!("aes"));
    }

    #[test]
    fn debug_output_hides_passwords() {
        let rendered = format!("{:?}", sample_security());
        assert!(!rendered.contains("foo"));
        assert!(!rendered.contains("bar"));
        assert!(rendered.contains("***"));
    }
}
