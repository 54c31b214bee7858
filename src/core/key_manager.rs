//! Key management: canonical values, key lookup and bookkeeping.
//!
//! A payload recovered by the delimiter pattern is canonicalized first: every
//! embedded `${...}` expression becomes a positional `{argN}` placeholder. The
//! canonical value is then resolved in three steps:
//!
//! 1. the caller's [`KnownTranslations`], optionally through a [`KeyResolver`]
//! 2. keys minted earlier in the same run
//! 3. the [`KeyGenerator`] (identity by default)

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::core::{
    DelimiterPattern, ExtractedString, KnownTranslations, SourcePosition, TranslationKey,
    UsedExistingKey,
};

/// What the resolver sees when a canonical value already has a known key.
#[derive(Debug, Clone, Copy)]
pub struct ResolverContext<'a> {
    pub file_path: &'a str,
    pub line: usize,
    pub column: usize,
    /// Every known key sharing the value, primary first.
    pub same_value_keys: &'a [TranslationKey],
}

/// `(existing_key, canonical_value, context) -> override`.
///
/// Returning `None` keeps the existing key.
pub type KeyResolver =
    Arc<dyn Fn(&TranslationKey, &str, &ResolverContext<'_>) -> Option<TranslationKey> + Send + Sync>;

/// `(canonical_value, file_path) -> key` for values with no known key.
pub type KeyGenerator = Arc<dyn Fn(&str, &str) -> TranslationKey + Send + Sync>;

/// Outcome of resolving a value that already has known keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyConflictDecision {
    /// Keep the primary key.
    ReuseExisting(TranslationKey),
    /// Use another known key sharing the same value.
    ReuseAlternate(TranslationKey),
    /// Use a key that is not known for this value.
    MintNew(TranslationKey),
}

impl KeyConflictDecision {
    pub fn key(&self) -> &TranslationKey {
        match self {
            KeyConflictDecision::ReuseExisting(key)
            | KeyConflictDecision::ReuseAlternate(key)
            | KeyConflictDecision::MintNew(key) => key,
        }
    }
}

/// A resolved literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub key: TranslationKey,
    pub canonical: String,
}

/// Per-file key state. Created fresh for each processed file.
pub struct KeyManager<'a> {
    pattern: &'a DelimiterPattern,
    known: &'a KnownTranslations,
    resolver: Option<&'a KeyResolver>,
    generator: Option<&'a KeyGenerator>,
    file_path: &'a str,
    generated: HashMap<String, TranslationKey>,
    extracted: Vec<ExtractedString>,
    extracted_seen: HashSet<(TranslationKey, String)>,
    used: Vec<UsedExistingKey>,
    used_seen: HashSet<(TranslationKey, String)>,
}

impl<'a> KeyManager<'a> {
    pub fn new(
        pattern: &'a DelimiterPattern,
        known: &'a KnownTranslations,
        resolver: Option<&'a KeyResolver>,
        generator: Option<&'a KeyGenerator>,
        file_path: &'a str,
    ) -> Self {
        Self {
            pattern,
            known,
            resolver,
            generator,
            file_path,
            generated: HashMap::new(),
            extracted: Vec::new(),
            extracted_seen: HashSet::new(),
            used: Vec::new(),
            used_seen: HashSet::new(),
        }
    }

    /// Resolve the key for a full delimiter match found at `position`.
    ///
    /// Returns `None` if the pattern does not match `full_match`, in which case
    /// the literal must be left alone.
    pub fn resolve(&mut self, full_match: &str, position: SourcePosition) -> Option<ResolvedKey> {
        let Some(payload) = self.pattern.capture(full_match) else {
            tracing::warn!(
                file = self.file_path,
                line = position.line,
                "delimiter pattern does not match collected text {:?}",
                full_match
            );
            return None;
        };

        Some(self.resolve_payload(payload, position))
    }

    /// Resolve the key for a payload already recovered from its delimiters.
    pub fn resolve_payload(&mut self, payload: &str, position: SourcePosition) -> ResolvedKey {
        let canonical = canonicalize(payload);
        let key = self.lookup(&canonical, position);
        ResolvedKey { key, canonical }
    }

    fn lookup(&mut self, canonical: &str, position: SourcePosition) -> TranslationKey {
        if let Some(primary) = self.known.primary_key(canonical) {
            let decision = self.decide(primary, canonical, position);
            tracing::debug!(value = canonical, ?decision, "known translation");
            return match decision {
                KeyConflictDecision::ReuseExisting(key) | KeyConflictDecision::ReuseAlternate(key) => {
                    self.record_used(&key, canonical, position);
                    key
                }
                KeyConflictDecision::MintNew(key) => {
                    self.record_extracted(&key, canonical, position);
                    key
                }
            };
        }

        if let Some(key) = self.generated.get(canonical) {
            return key.clone();
        }

        let key = match self.generator {
            Some(generator) => generator(canonical, self.file_path),
            None => TranslationKey::from(canonical),
        };
        tracing::debug!(value = canonical, %key, "minted key");
        self.generated.insert(canonical.to_string(), key.clone());
        self.record_extracted(&key, canonical, position);
        key
    }

    /// Ask the resolver whether the primary key should be kept.
    pub fn decide(
        &self,
        primary: &TranslationKey,
        canonical: &str,
        position: SourcePosition,
    ) -> KeyConflictDecision {
        let same_value_keys = self.known.keys_for(canonical);
        let Some(resolver) = self.resolver else {
            return KeyConflictDecision::ReuseExisting(primary.clone());
        };

        let context = ResolverContext {
            file_path: self.file_path,
            line: position.line,
            column: position.column,
            same_value_keys,
        };
        match resolver(primary, canonical, &context) {
            None => KeyConflictDecision::ReuseExisting(primary.clone()),
            Some(key) if &key == primary => KeyConflictDecision::ReuseExisting(key),
            Some(key) if same_value_keys.contains(&key) => KeyConflictDecision::ReuseAlternate(key),
            Some(key) => KeyConflictDecision::MintNew(key),
        }
    }

    fn record_extracted(&mut self, key: &TranslationKey, value: &str, position: SourcePosition) {
        if !self.extracted_seen.insert((key.clone(), value.to_string())) {
            return;
        }
        self.extracted.push(ExtractedString {
            key: key.clone(),
            value: value.to_string(),
            file_path: self.file_path.to_string(),
            line: position.line,
            column: position.column,
        });
    }

    fn record_used(&mut self, key: &TranslationKey, value: &str, position: SourcePosition) {
        // one file per manager, so (key, value) identifies the triple
        if !self.used_seen.insert((key.clone(), value.to_string())) {
            return;
        }
        self.used.push(UsedExistingKey {
            file_path: self.file_path.to_string(),
            line: position.line,
            column: position.column,
            key: key.clone(),
            value: value.to_string(),
        });
    }

    pub fn extracted(&self) -> &[ExtractedString] {
        &self.extracted
    }

    pub fn used(&self) -> &[UsedExistingKey] {
        &self.used
    }

    pub fn into_records(self) -> (Vec<ExtractedString>, Vec<UsedExistingKey>) {
        (self.extracted, self.used)
    }
}

/// Replace every `${...}` placeholder with `{arg1}`, `{arg2}`, ... left to right.
///
/// Braces are balanced and string literals inside the expression are skipped.
/// Other braces, such as `{userName}`, are content and stay untouched. An
/// unterminated `${` is kept verbatim.
pub fn canonicalize(payload: &str) -> String {
    let bytes = payload.as_bytes();
    let mut out = String::with_capacity(payload.len());
    let mut index = 0;
    let mut copied = 0;
    let mut arg = 0;

    while index + 1 < bytes.len() {
        if bytes[index] == b'$' && bytes[index + 1] == b'{' {
            if let Some(close) = find_placeholder_end(bytes, index + 2) {
                arg += 1;
                out.push_str(&payload[copied..index]);
                out.push_str(&format!("{{arg{}}}", arg));
                index = close + 1;
                copied = index;
                continue;
            }
            break;
        }
        index += 1;
    }

    out.push_str(&payload[copied..]);
    out
}

/// Index of the `}` closing a placeholder whose expression starts at `from`.
fn find_placeholder_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = from;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
        } else {
            match b {
                b'"' | b'\'' | b'`' => quote = Some(b),
                b'{' => depth += 1,
                b'}' if depth == 0 => return Some(i),
                b'}' => depth -= 1,
                _ => {}
            }
        }
        i += 1;
    }
    None
}
