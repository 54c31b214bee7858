use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use crate::core::ExtractedString;

/// What happened to an extracted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Added,
    /// Already present with the same value.
    Unchanged,
    /// Already present with another value, which is kept.
    Kept,
}

impl KeyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAction::Added => "added",
            KeyAction::Unchanged => "unchanged",
            KeyAction::Kept => "kept",
        }
    }
}

/// Writer for the flat `key -> value` extracted strings file.
pub struct ExtractedWriter {
    file_path: PathBuf,
    data: Map<String, Value>,
}

impl ExtractedWriter {
    /// Open an existing JSON file or start an empty one
    pub fn open_or_create(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            let value: Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
            match value {
                Value::Object(map) => map,
                _ => bail!("Root of JSON file must be an object: {}", path.display()),
            }
        } else {
            Map::new()
        };

        Ok(Self {
            file_path: path.to_path_buf(),
            data,
        })
    }

    pub fn add(&mut self, extracted: &ExtractedString) -> KeyAction {
        let key = extracted.key.to_string();
        match self.data.get(&key) {
            None => {
                self.data.insert(key, Value::String(extracted.value.clone()));
                KeyAction::Added
            }
            Some(Value::String(existing)) if *existing == extracted.value => KeyAction::Unchanged,
            Some(_) => {
                tracing::warn!(key = %key, "key already present with another value, keeping it");
                KeyAction::Kept
            }
        }
    }

    /// Add every entry, returning how many keys were new.
    pub fn add_all<'a>(&mut self, extracted: impl IntoIterator<Item = &'a ExtractedString>) -> usize {
        extracted
            .into_iter()
            .filter(|e| self.add(e) == KeyAction::Added)
            .count()
    }

    /// Save with 2-space indentation and a trailing newline.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(&self.data).context("Failed to serialize JSON")?;

        fs::write(&self.file_path, format!("{}\n", content))
            .with_context(|| format!("Failed to write file: {}", self.file_path.display()))?;

        Ok(())
    }
}
