use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    AccessorConfig, CommentStyle, ConfigWarning, DEFAULT_PATTERN, DelimiterPattern,
    TransformOptions,
};

pub const CONFIG_FILE_NAME: &str = ".glotxrc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/*.spec.vue",
    "**/__tests__/**",
];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_translations: Option<String>,
    #[serde(default, rename = "i18nImport", skip_serializing_if = "Option::is_none")]
    pub i18n_import: Option<I18nImport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_import: Option<String>,
    #[serde(default)]
    pub no_import: bool,
    #[serde(default = "default_global_function")]
    pub global_function: String,
    #[serde(default = "default_template_function")]
    pub template_function: String,
    #[serde(default)]
    pub append_extracted_comment: bool,
    #[serde(default)]
    pub extracted_comment_type: CommentStyle,
}

/// Current form of the accessor import options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nImport {
    #[serde(default = "default_accessor_name")]
    pub name: String,
    #[serde(default = "default_import_name")]
    pub import_name: String,
    #[serde(default = "default_import_source")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub default_import: bool,
    #[serde(default = "default_destructure")]
    pub destructure: bool,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_ignore_test_files() -> bool {
    true
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_output_path() -> String {
    "./locales/extracted.json".to_string()
}

fn default_global_function() -> String {
    "i18n.t".to_string()
}

fn default_template_function() -> String {
    "$t".to_string()
}

fn default_accessor_name() -> String {
    AccessorConfig::default().name
}

fn default_import_name() -> String {
    AccessorConfig::default().import_name
}

fn default_import_source() -> String {
    AccessorConfig::default().source
}

fn default_destructure() -> bool {
    true
}

impl Default for I18nImport {
    fn default() -> Self {
        Self {
            name: default_accessor_name(),
            import_name: default_import_name(),
            source: default_import_source(),
            alias: None,
            default_import: false,
            destructure: default_destructure(),
        }
    }
}

impl From<I18nImport> for AccessorConfig {
    fn from(value: I18nImport) -> Self {
        Self {
            name: value.name,
            import_name: value.import_name,
            source: value.source,
            alias: value.alias,
            default_import: value.default_import,
            destructure: value.destructure,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: Vec::new(),
            includes: default_includes(),
            ignore_test_files: default_ignore_test_files(),
            pattern: default_pattern(),
            output_path: default_output_path(),
            existing_translations: None,
            i18n_import: Some(I18nImport::default()),
            translation_method: None,
            hook_name: None,
            hook_import: None,
            no_import: false,
            global_function: default_global_function(),
            template_function: default_template_function(),
            append_extracted_comment: false,
            extracted_comment_type: CommentStyle::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob patterns in `ignores` or `includes` are invalid,
    /// or if `pattern` is not a regex with exactly one capture group.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // only wildcard includes are globs, `pages/[id]` stays a literal path
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        DelimiterPattern::new(&self.pattern).context("Invalid 'pattern'")?;

        Ok(())
    }

    /// Build the runtime options, reporting deprecated or conflicting option forms.
    pub fn to_options(&self) -> Result<(TransformOptions, Vec<ConfigWarning>)> {
        let pattern = DelimiterPattern::new(&self.pattern).context("Invalid 'pattern'")?;
        let (accessor, warnings) = self.accessor();

        let options = TransformOptions {
            pattern,
            accessor,
            no_import: self.no_import,
            global_function: self.global_function.clone(),
            template_function: self.template_function.clone(),
            extraction_comment: self
                .append_extracted_comment
                .then_some(self.extracted_comment_type),
            ..Default::default()
        };
        Ok((options, warnings))
    }

    fn accessor(&self) -> (AccessorConfig, Vec<ConfigWarning>) {
        let deprecated = [
            ("translationMethod", "i18nImport.name", &self.translation_method),
            ("hookName", "i18nImport.importName", &self.hook_name),
            ("hookImport", "i18nImport.source", &self.hook_import),
        ];
        let mut warnings = Vec::new();

        match &self.i18n_import {
            Some(current) => {
                let used = [&current.name, &current.import_name, &current.source];
                for ((name, replacement, value), used) in deprecated.into_iter().zip(used) {
                    let Some(value) = value else { continue };
                    if value != used {
                        warnings.push(ConfigWarning::ConflictingOption {
                            deprecated: name.to_string(),
                            replacement: replacement.to_string(),
                            ignored: value.clone(),
                            used: used.clone(),
                        });
                    } else {
                        warnings.push(ConfigWarning::DeprecatedOption {
                            deprecated: name.to_string(),
                            replacement: replacement.to_string(),
                        });
                    }
                }
                (current.clone().into(), warnings)
            }
            None => {
                let mut accessor = AccessorConfig::default();
                let targets = [
                    &mut accessor.name,
                    &mut accessor.import_name,
                    &mut accessor.source,
                ];
                for ((name, replacement, value), target) in deprecated.into_iter().zip(targets) {
                    let Some(value) = value else { continue };
                    *target = value.clone();
                    warnings.push(ConfigWarning::DeprecatedOption {
                        deprecated: name.to_string(),
                        replacement: replacement.to_string(),
                    });
                }
                (accessor, warnings)
            }
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.ignores.is_empty());
        assert_eq!(config.includes, vec!["src"]);
        assert_eq!(config.pattern, "___(.+)___");
        assert_eq!(config.output_path, "./locales/extracted.json");
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "ignores": ["**/dist/**"],
              "includes": ["app/**"],
              "pattern": "%%(.+?)%%",
              "i18nImport": { "name": "translate", "source": "@/i18n" },
              "appendExtractedComment": true,
              "extractedCommentType": "line"
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.ignores, vec!["**/dist/**"]);
        assert_eq!(config.includes, vec!["app/**"]);

        let (options, warnings) = config.to_options().unwrap();
        assert!(warnings.is_empty());
        assert_eq!(options.pattern.as_str(), "%%(.+?)%%");
        assert_eq!(options.accessor.name, "translate");
        assert_eq!(options.accessor.import_name, "useTranslation");
        assert_eq!(options.accessor.source, "@/i18n");
        assert_eq!(options.extraction_comment, Some(CommentStyle::Line));
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "ignores": ["**/dist/**"] }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.ignores, vec!["**/dist/**"]);
        assert_eq!(config.includes, default_includes());
        assert!(config.ignore_test_files);

        let (options, _) = config.to_options().unwrap();
        assert_eq!(options.accessor, AccessorConfig::default());
        assert_eq!(options.extraction_comment, None);
    }

    #[test]
    fn test_deprecated_options_apply_when_current_form_is_absent() {
        let json = r#"{ "translationMethod": "tr", "hookName": "useI18n" }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        let (options, warnings) = config.to_options().unwrap();
        assert_eq!(options.accessor.name, "tr");
        assert_eq!(options.accessor.import_name, "useI18n");
        assert_eq!(options.accessor.source, "react-i18next");
        assert_eq!(
            warnings.iter().map(|w| w.code()).collect::<Vec<_>>(),
            vec!["deprecated-option", "deprecated-option"]
        );
    }

    #[test]
    fn test_current_form_wins_over_conflicting_deprecated_option() {
        let json = r#"{
              "hookImport": "next-i18next",
              "i18nImport": { "source": "react-i18next" }
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        let (options, warnings) = config.to_options().unwrap();
        assert_eq!(options.accessor.source, "react-i18next");
        assert_eq!(
            warnings,
            vec![ConfigWarning::ConflictingOption {
                deprecated: "hookImport".to_string(),
                replacement: "i18nImport.source".to_string(),
                ignored: "next-i18next".to_string(),
                used: "react-i18next".to_string(),
            }]
        );
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, r#"{ "ignores": ["**/test/**"] }"#).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file);
        assert_eq!(result.config.ignores, vec!["**/test/**"]);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.config.includes, default_includes());
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            ignores: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("ignores"));
    }

    #[test]
    fn test_validate_literal_bracket_include_is_valid() {
        let config = Config {
            includes: vec!["pages/[id]".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_pattern_needs_one_capture_group() {
        let config = Config {
            pattern: "___.+___".to_string(),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("pattern"));
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "pattern": "(" }"#).unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("\"i18nImport\""));
        assert!(!json.contains("hookName"));

        let config: Config = serde_json::from_str(&json).unwrap();
        let (_, warnings) = config.to_options().unwrap();
        assert!(warnings.is_empty());
    }
}
