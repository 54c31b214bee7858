//! Filesystem side of a run: reading sources and known translations, fanning
//! files out over the rayon pool.

use std::{collections::BTreeSet, fs, path::Path};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::core::{KnownTranslations, TransformOptions, TransformOutput, transform_source};

/// Outcome of one file of a batch.
pub struct FileOutcome {
    pub file_path: String,
    pub result: Result<TransformOutput>,
}

pub fn transform_file(
    path: &Path,
    options: &TransformOptions,
    known: &KnownTranslations,
) -> Result<TransformOutput> {
    let code = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(transform_source(&code, &path.to_string_lossy(), options, known))
}

/// Transform every file in parallel. Outcomes come back in path order.
pub fn process_files(
    files: &BTreeSet<String>,
    options: &TransformOptions,
    known: &KnownTranslations,
) -> Vec<FileOutcome> {
    let mut outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|file_path| FileOutcome {
            file_path: file_path.clone(),
            result: transform_file(Path::new(file_path), options, known),
        })
        .collect();

    // par_iter over a BTreeSet keeps order, sort anyway so callers never depend on it
    outcomes.sort_by(|a, b| a.file_path.cmp(&b.file_path));
    outcomes
}

/// Load a key → value JSON file of translations that already exist.
pub fn load_known_translations(path: &Path) -> Result<KnownTranslations> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read translations: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
    let known = KnownTranslations::from_json_value(&value);
    tracing::debug!(path = %path.display(), values = known.len(), "loaded known translations");
    Ok(known)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TranslationKey;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_process_files_in_path_order() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b.ts");
        let a = dir.path().join("a.ts");
        fs::write(&b, "const x = \"___Bee___\";\n").unwrap();
        fs::write(&a, "const y = 1;\n").unwrap();

        let files: BTreeSet<String> = [&b, &a]
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        let outcomes = process_files(&files, &TransformOptions::default(), &KnownTranslations::new());

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].file_path.ends_with("a.ts"));
        let a_out = outcomes[0].result.as_ref().unwrap();
        assert!(!a_out.is_modified());
        let b_out = outcomes[1].result.as_ref().unwrap();
        assert_eq!(b_out.extracted_strings.len(), 1);
        assert_eq!(b_out.extracted_strings[0].value, "Bee");
    }

    #[test]
    fn test_missing_file_is_an_error_outcome() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone.tsx");

        let result = transform_file(&missing, &TransformOptions::default(), &KnownTranslations::new());
        assert!(result.unwrap_err().to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_load_known_translations_flattens_nested_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");
        fs::write(
            &path,
            r#"{"common": {"ok": "OK", "yes": "OK"}, "title": "Welcome"}"#,
        )
        .unwrap();

        let known = load_known_translations(&path).unwrap();
        assert_eq!(known.primary_key("OK"), Some(&TranslationKey::from("common.ok")));
        assert_eq!(
            known.keys_for("OK"),
            &[TranslationKey::from("common.ok"), TranslationKey::from("common.yes")]
        );
        assert_eq!(known.primary_key("Welcome"), Some(&TranslationKey::from("title")));
    }

    #[test]
    fn test_load_known_translations_rejects_bad_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");
        fs::write(&path, "{ nope").unwrap();

        assert!(load_known_translations(&path).is_err());
    }
}
