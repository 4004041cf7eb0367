//! Bundle building and serialization.
//!
//! Turns a scanned catalog set into the nested
//! `language -> category -> message -> text` mapping and renders it, together
//! with the resolver script, into the artifact the browser loads. BTreeMaps
//! keep every level sorted, so identical catalog content always serializes to
//! identical bytes — that is what lets racing rebuilds converge and the
//! fingerprint act as a cache-busting version.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntries, CatalogFile, CatalogLoader};
use crate::config::BundleConfig;
use crate::error::PresseError;
use crate::runtime::render_runtime_script;

/// The compiled `language -> category -> message -> text` mapping.
///
/// Built fresh on every regeneration and immutable once rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationMapping(BTreeMap<String, BTreeMap<String, CatalogEntries>>);

impl TranslationMapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no language holds any entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Languages present in the mapping, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of languages.
    pub fn language_count(&self) -> usize {
        self.0.len()
    }

    /// Total number of message entries across all languages and categories.
    pub fn message_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|categories| categories.values())
            .map(|entries| entries.len())
            .sum()
    }

    /// Merge one catalog's entries into `(language, category)`, key by key.
    ///
    /// An entry already present for the same key is overwritten, so for
    /// duplicate keys across files the last-merged file wins.
    pub fn merge_entries(&mut self, language: &str, category: &str, entries: CatalogEntries) {
        self.0
            .entry(language.to_string())
            .or_default()
            .entry(category.to_string())
            .or_default()
            .extend(entries);
    }

    /// Safe-navigation lookup: `None` at the first absent level.
    pub fn lookup(&self, language: &str, category: &str, message: &str) -> Option<&str> {
        self.0
            .get(language)?
            .get(category)?
            .get(message)
            .map(String::as_str)
    }
}

/// Whether `segment` can be a language code: non-empty, ASCII letters and
/// hyphens only (`ru`, `pt-BR`).
pub(crate) fn is_language_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
}

/// Split a catalog file's relative signature into `(language, category)`.
///
/// The first path segment is the language code; everything after the first
/// separator is the category, taken verbatim — a deeper path like
/// `ru/widgets/cart` simply yields the category `widgets/cart`. Returns
/// `None` when there is no separator (a catalog sitting directly in a base
/// directory names no language) or when the first segment is not a language
/// code; such files are skipped, never guessed at.
pub fn split_catalog_key(signature: &str) -> Option<(&str, &str)> {
    let (language, category) = signature.split_once('/')?;
    if !is_language_segment(language) || category.is_empty() {
        return None;
    }
    Some((language, category))
}

fn relative_signature(file: &CatalogFile, extension: &str) -> Option<String> {
    let relative = file.path.strip_prefix(&file.base).ok()?;
    let signature = relative.to_string_lossy().replace('\\', "/");
    let suffix = format!(".{extension}");
    let stripped = signature.strip_suffix(&suffix)?;
    Some(stripped.to_string())
}

/// Build the translation mapping from a scanned catalog set.
///
/// Files are merged in the order given; the scanner's sorted order makes the
/// result reproducible. When two files contribute the same
/// (language, category, message), the last-scanned file wins — defined
/// behavior, but worth knowing when catalogs overlap across base
/// directories. Files whose relative path does not follow the
/// `language/category` convention are skipped with a warning.
pub fn build(
    files: &[CatalogFile],
    extension: &str,
    loader: &dyn CatalogLoader,
) -> Result<TranslationMapping, PresseError> {
    let mut mapping = TranslationMapping::new();

    for file in files {
        let Some(signature) = relative_signature(file, extension) else {
            tracing::warn!(path = %file.path.display(), "catalog file outside its base directory; skipped");
            continue;
        };
        let Some((language, category)) = split_catalog_key(&signature) else {
            tracing::warn!(
                path = %file.path.display(),
                "catalog path does not follow the language/category convention; skipped"
            );
            continue;
        };

        let entries = loader.load(&file.path)?;
        mapping.merge_entries(language, category, entries);
    }

    Ok(mapping)
}

/// serde_json formatter that additionally escapes `/` as `\/`.
///
/// The mapping is embedded in a script; with slashes escaped, `</script>`
/// can never appear inside a string value, whatever the catalogs contain.
struct ScriptSafeFormatter;

impl serde_json::ser::Formatter for ScriptSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut rest = fragment;
        while let Some(pos) = rest.find('/') {
            writer.write_all(rest[..pos].as_bytes())?;
            writer.write_all(b"\\/")?;
            rest = &rest[pos + 1..];
        }
        writer.write_all(rest.as_bytes())
    }
}

/// Serialize the mapping to compact, script-safe JSON.
///
/// Deterministic: keys are sorted at every level and the formatter has no
/// configuration, so equal mappings yield equal bytes.
pub fn mapping_json(mapping: &TranslationMapping) -> Result<String, PresseError> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, ScriptSafeFormatter);
    mapping.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf).expect("serde_json emits UTF-8"))
}

/// Render the full artifact: the global assignment plus the resolver script.
pub fn render(mapping: &TranslationMapping, config: &BundleConfig) -> Result<String, PresseError> {
    let json = mapping_json(mapping)?;
    let mut artifact = format!("var {} = {};\n", config.global_name, json);
    artifact.push_str(&render_runtime_script(
        &config.namespace,
        &config.global_name,
        &config.source_language,
    ));
    Ok(artifact)
}

/// Write the artifact, creating intermediate directories as needed.
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), PresseError> {
    let write = || -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    };
    write().map_err(|source| PresseError::ArtifactWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::JsonCatalogLoader;
    use std::time::SystemTime;

    fn entries(pairs: &[(&str, &str)]) -> CatalogEntries {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn catalog_file(base: &Path, rel: &str) -> CatalogFile {
        CatalogFile {
            path: base.join(rel),
            base: base.to_path_buf(),
            modified: SystemTime::now(),
        }
    }

    // =========================================================================
    // Key derivation
    // =========================================================================

    #[test]
    fn splits_two_segment_signature() {
        assert_eq!(split_catalog_key("ru/app"), Some(("ru", "app")));
        assert_eq!(split_catalog_key("pt-BR/app"), Some(("pt-BR", "app")));
    }

    #[test]
    fn deeper_nesting_lands_in_the_category() {
        assert_eq!(
            split_catalog_key("ru/widgets/cart"),
            Some(("ru", "widgets/cart"))
        );
    }

    #[test]
    fn rejects_signatures_without_a_language() {
        assert_eq!(split_catalog_key("app"), None, "no separator");
        assert_eq!(split_catalog_key("/app"), None, "empty language");
        assert_eq!(split_catalog_key("ru/"), None, "empty category");
        assert_eq!(split_catalog_key("ru2/app"), None, "digit in language");
        assert_eq!(split_catalog_key("r u/app"), None, "space in language");
    }

    // =========================================================================
    // Mapping
    // =========================================================================

    #[test]
    fn merge_is_per_key_and_last_wins() {
        let mut mapping = TranslationMapping::new();
        mapping.merge_entries("ru", "app", entries(&[("Hello", "old"), ("Bye", "Пока")]));
        mapping.merge_entries("ru", "app", entries(&[("Hello", "Привет")]));

        assert_eq!(mapping.lookup("ru", "app", "Hello"), Some("Привет"));
        assert_eq!(mapping.lookup("ru", "app", "Bye"), Some("Пока"));
        assert_eq!(mapping.message_count(), 2);
    }

    #[test]
    fn lookup_is_none_at_any_absent_level() {
        let mut mapping = TranslationMapping::new();
        mapping.merge_entries("ru", "app", entries(&[("Hello", "Привет")]));

        assert_eq!(mapping.lookup("de", "app", "Hello"), None);
        assert_eq!(mapping.lookup("ru", "mail", "Hello"), None);
        assert_eq!(mapping.lookup("ru", "app", "Bye"), None);
    }

    // =========================================================================
    // Building from files
    // =========================================================================

    #[test]
    fn builds_mapping_from_catalog_tree() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        std::fs::create_dir_all(base.join("ru/widgets")).unwrap();
        std::fs::create_dir_all(base.join("de")).unwrap();
        std::fs::write(base.join("ru/app.json"), r#"{"Hello": "Привет"}"#).unwrap();
        std::fs::write(base.join("ru/widgets/cart.json"), r#"{"Add": "Добавить"}"#).unwrap();
        std::fs::write(base.join("de/app.json"), r#"{"Hello": "Hallo"}"#).unwrap();

        let files = vec![
            catalog_file(base, "de/app.json"),
            catalog_file(base, "ru/app.json"),
            catalog_file(base, "ru/widgets/cart.json"),
        ];
        let mapping = build(&files, "json", &JsonCatalogLoader).unwrap();

        assert_eq!(mapping.lookup("ru", "app", "Hello"), Some("Привет"));
        assert_eq!(mapping.lookup("ru", "widgets/cart", "Add"), Some("Добавить"));
        assert_eq!(mapping.lookup("de", "app", "Hello"), Some("Hallo"));
        assert_eq!(mapping.language_count(), 2);
    }

    #[test]
    fn skips_files_outside_the_convention() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        std::fs::write(base.join("stray.json"), r#"{"Hello": "???"}"#).unwrap();

        let files = vec![catalog_file(base, "stray.json")];
        let mapping = build(&files, "json", &JsonCatalogLoader).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn duplicate_keys_across_files_take_the_last_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        std::fs::create_dir_all(first.join("ru")).unwrap();
        std::fs::create_dir_all(second.join("ru")).unwrap();
        std::fs::write(first.join("ru/app.json"), r#"{"Hello": "Первый"}"#).unwrap();
        std::fs::write(second.join("ru/app.json"), r#"{"Hello": "Второй"}"#).unwrap();

        let files = vec![
            catalog_file(&first, "ru/app.json"),
            catalog_file(&second, "ru/app.json"),
        ];
        let mapping = build(&files, "json", &JsonCatalogLoader).unwrap();
        assert_eq!(mapping.lookup("ru", "app", "Hello"), Some("Второй"));
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    #[test]
    fn json_is_sorted_and_compact() {
        let mut mapping = TranslationMapping::new();
        mapping.merge_entries("ru", "app", entries(&[("b", "2"), ("a", "1")]));
        mapping.merge_entries("de", "app", entries(&[("a", "eins")]));

        insta::assert_snapshot!(
            mapping_json(&mapping).unwrap(),
            @r#"{"de":{"app":{"a":"eins"}},"ru":{"app":{"a":"1","b":"2"}}}"#
        );
    }

    #[test]
    fn json_escapes_forward_slashes() {
        let mut mapping = TranslationMapping::new();
        mapping.merge_entries("ru", "app", entries(&[("Tag", "</script><b>x</b>")]));

        let json = mapping_json(&mapping).unwrap();
        assert!(json.contains(r#"<\/script><b>x<\/b>"#));
        assert!(!json.contains("</script>"));
    }

    #[test]
    fn serialization_is_deterministic() {
        let mut mapping = TranslationMapping::new();
        mapping.merge_entries("ru", "app", entries(&[("Hello", "Привет"), ("Bye", "Пока")]));
        mapping.merge_entries("de", "mail", entries(&[("Hello", "Hallo")]));

        assert_eq!(mapping_json(&mapping).unwrap(), mapping_json(&mapping).unwrap());
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[test]
    fn artifact_holds_assignment_then_resolver() {
        let mut mapping = TranslationMapping::new();
        mapping.merge_entries("ru", "app", entries(&[("Hello", "Привет")]));
        let config = BundleConfig::default();

        let artifact = render(&mapping, &config).unwrap();
        assert!(artifact.starts_with("var KOINE_I18N = {\"ru\""));
        assert!(artifact.contains(";\n(function () {"));
        assert!(artifact.contains("ns.t = function"));
    }

    #[test]
    fn empty_mapping_still_installs_a_resolver() {
        let artifact = render(&TranslationMapping::new(), &BundleConfig::default()).unwrap();
        assert!(artifact.starts_with("var KOINE_I18N = {};\n"));
        assert!(artifact.contains("ns.t = function"));
    }

    #[test]
    fn embedded_json_round_trips() {
        let mut mapping = TranslationMapping::new();
        mapping.merge_entries("ru", "app", entries(&[("Hello", "Привет"), ("Path", "a/b")]));
        let config = BundleConfig::default();

        let artifact = render(&mapping, &config).unwrap();
        let assignment = artifact.lines().next().unwrap();
        let json = assignment
            .strip_prefix("var KOINE_I18N = ")
            .unwrap()
            .strip_suffix(';')
            .unwrap();

        let decoded: TranslationMapping = serde_json::from_str(json).unwrap();
        assert_eq!(decoded, mapping);
    }

    #[test]
    fn write_artifact_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web/js/i18n.js");

        write_artifact(&path, "var X = {};\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "var X = {};\n");
    }
}
