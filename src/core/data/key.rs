use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ExtractedString;

/// A translation key as it appears in a call: `t("common.ok")` or `t(42)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationKey {
    Number(i64),
    Text(String),
}

impl TranslationKey {
    /// Render the key as a JavaScript literal usable as a call argument.
    ///
    /// Text keys use JSON string escaping, which is also valid JavaScript.
    pub fn to_js_literal(&self) -> String {
        match self {
            TranslationKey::Number(n) => n.to_string(),
            TranslationKey::Text(s) => {
                serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
            }
        }
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationKey::Number(n) => write!(f, "{}", n),
            TranslationKey::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for TranslationKey {
    fn from(value: &str) -> Self {
        TranslationKey::Text(value.to_string())
    }
}

impl From<String> for TranslationKey {
    fn from(value: String) -> Self {
        TranslationKey::Text(value)
    }
}

impl From<i64> for TranslationKey {
    fn from(value: i64) -> Self {
        TranslationKey::Number(value)
    }
}

/// Canonical value → keys map of translations known before the run.
///
/// Several keys may share one value; the first one inserted is the primary key,
/// the full list is handed to key conflict resolvers as `same_value_keys`.
///
/// The map is owned by the caller and only read by the core. Build it once per
/// batch and do not mutate it while files are being processed.
#[derive(Debug, Clone, Default)]
pub struct KnownTranslations {
    by_value: HashMap<String, Vec<TranslationKey>>,
}

impl KnownTranslations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` as a translation of `value`. Duplicate pairs are ignored.
    pub fn insert(&mut self, key: impl Into<TranslationKey>, value: impl Into<String>) {
        let key = key.into();
        let keys = self.by_value.entry(value.into()).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    /// The key reused by default for `value`.
    pub fn primary_key(&self, value: &str) -> Option<&TranslationKey> {
        self.by_value.get(value).and_then(|keys| keys.first())
    }

    /// All keys sharing `value`, primary first.
    pub fn keys_for(&self, value: &str) -> &[TranslationKey] {
        self.by_value
            .get(value)
            .map(|keys| keys.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_value.is_empty()
    }

    /// Build from a key → value JSON object.
    ///
    /// Nested objects are flattened with `.` (`{"common": {"ok": "OK"}}` → `common.ok`).
    /// Non-string leaves are ignored.
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        let mut known = Self::new();
        flatten_into(value, String::new(), &mut known);
        known
    }

    /// Seed from the strings extracted by an earlier run.
    pub fn from_extracted(strings: &[ExtractedString]) -> Self {
        let mut known = Self::new();
        for s in strings {
            known.insert(s.key.clone(), s.value.clone());
        }
        known
    }
}

fn flatten_into(value: &serde_json::Value, prefix: String, known: &mut KnownTranslations) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map {
                let new_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(val, new_prefix, known);
            }
        }
        serde_json::Value::String(s) if !prefix.is_empty() => {
            known.insert(prefix, s.clone());
        }
        _ => {}
    }
}
