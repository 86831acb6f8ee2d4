//! Book configuration and pinned-version resolution.
//!
//! Config lives in a project-local `bookstage.toml`:
//!
//! ```toml
//! [source]
//! host = "github.com"
//! org = "typst"
//!
//! [versions]
//! typst = "701c7f9b2853857cde6f4dd76763b9bb118aff14 2024-03-05T10:00:00+02:00"
//! ```
//!
//! Each `[versions]` value is a single string: the revision id, then the
//! revision's author timestamp, separated by the first whitespace run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BookstageError, Result};
use crate::types::ProjectVersion;

/// Default configuration file name, looked up in the book root.
const CONFIG_FILE_NAME: &str = "bookstage.toml";

// ---------------------------------------------------------------------------
// Config structs (matching bookstage.toml schema)
// ---------------------------------------------------------------------------

/// Top-level book config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookConfig {
    /// Upstream hosting settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Pinned revisions: project name → `"<revision> <timestamp>"`.
    pub versions: BTreeMap<String, String>,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Hosting service domain.
    #[serde(default = "default_host")]
    pub host: String,

    /// Organization/owner under which the projects live.
    #[serde(default = "default_org")]
    pub org: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            org: default_org(),
        }
    }
}

fn default_host() -> String {
    "github.com".into()
}
fn default_org() -> String {
    "typst".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the config file inside a book root directory.
pub fn default_config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Load the book config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<BookConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BookstageError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        BookstageError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Write a default config file (empty `[versions]` table) at `path`.
pub fn write_default_config(path: &Path) -> Result<()> {
    let config = BookConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BookstageError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| BookstageError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}

// ---------------------------------------------------------------------------
// Version resolution
// ---------------------------------------------------------------------------

/// Resolve every `[versions]` entry into a [`ProjectVersion`].
pub fn resolve_versions(config: &BookConfig) -> Result<BTreeMap<String, ProjectVersion>> {
    config
        .versions
        .iter()
        .map(|(name, value)| {
            let version = parse_pinned(name, value, &config.source)?;
            Ok((name.clone(), version))
        })
        .collect()
}

/// Parse one `"<revision> <timestamp>"` entry.
///
/// The revision must not contain whitespace; the timestamp may (git's ISO
/// output uses a space separator), so we split on the first whitespace run
/// only.
fn parse_pinned(name: &str, value: &str, source: &SourceConfig) -> Result<ProjectVersion> {
    let (revision, rest) = value.split_once(char::is_whitespace).ok_or_else(|| {
        BookstageError::config(format!(
            "version entry for '{name}' must be '<revision> <timestamp>', got '{value}'"
        ))
    })?;
    let timestamp = rest.trim_start();

    let instant = parse_timestamp(timestamp).map_err(|e| {
        BookstageError::config(format!("invalid timestamp for '{name}': '{timestamp}': {e}"))
    })?;
    let author_date = instant.with_timezone(&Utc).date_naive();

    let base = format!(
        "https://{}/{}/{}/raw/{}",
        source.host, source.org, name, revision
    );
    let base_url = Url::parse(&base)
        .map_err(|e| BookstageError::config(format!("invalid base URL '{base}': {e}")))?;

    Ok(ProjectVersion {
        revision: revision.to_string(),
        author_date,
        base_url,
    })
}

/// Accept RFC 3339 (`2024-03-05T10:00:00+02:00`) and git's default ISO
/// form (`2024-03-05 10:00:00 +0200`).
fn parse_timestamp(s: &str) -> chrono::ParseResult<DateTime<chrono::FixedOffset>> {
    DateTime::parse_from_rfc3339(s).or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(name: &str, value: &str) -> BookConfig {
        let mut config = BookConfig::default();
        config.versions.insert(name.into(), value.into());
        config
    }

    #[test]
    fn version_derivation() {
        let config = config_with("hayagriva", "abc123 2024-03-05T10:00:00+02:00");
        let versions = resolve_versions(&config).expect("resolve");

        let v = &versions["hayagriva"];
        assert_eq!(v.revision, "abc123");
        // +02:00 at 10:00 is still the same UTC calendar day
        assert_eq!(v.author_date.to_string(), "2024-03-05");
        assert_eq!(
            v.base_url.as_str(),
            "https://github.com/typst/hayagriva/raw/abc123"
        );
    }

    #[test]
    fn timestamp_normalized_to_utc_date() {
        // 01:30 at +05:00 is 20:30 UTC on the *previous* day
        let config = config_with("typst", "deadbeef 2024-03-05T01:30:00+05:00");
        let versions = resolve_versions(&config).expect("resolve");
        assert_eq!(versions["typst"].author_date.to_string(), "2024-03-04");
    }

    #[test]
    fn git_iso_timestamp_accepted() {
        let config = config_with("codex", "cafe0000 2024-06-01 12:00:00 +0200");
        let versions = resolve_versions(&config).expect("resolve");
        assert_eq!(versions["codex"].author_date.to_string(), "2024-06-01");
        assert_eq!(versions["codex"].revision, "cafe0000");
    }

    #[test]
    fn malformed_entry_is_config_error() {
        // No whitespace separator at all
        let config = config_with("typst", "abc123");
        let err = resolve_versions(&config).unwrap_err();
        assert!(matches!(err, BookstageError::Config { .. }));
        assert!(err.to_string().contains("typst"));

        // Separator present but the suffix is not a timestamp
        let config = config_with("typst", "abc123 not-a-date");
        let err = resolve_versions(&config).unwrap_err();
        assert!(matches!(err, BookstageError::Config { .. }));
    }

    #[test]
    fn missing_versions_section_is_config_error() {
        let err = toml::from_str::<BookConfig>("[source]\nhost = \"github.com\"\n");
        assert!(err.is_err());

        // And through the loader the message names the file
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookstage.toml");
        std::fs::write(&path, "[source]\norg = \"typst\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, BookstageError::Config { .. }));
        assert!(err.to_string().contains("bookstage.toml"));
    }

    #[test]
    fn source_defaults_apply() {
        let config: BookConfig =
            toml::from_str("[versions]\ntypst = \"abc 2024-01-01T00:00:00Z\"\n").expect("parse");
        assert_eq!(config.source.host, "github.com");
        assert_eq!(config.source.org, "typst");
    }

    #[test]
    fn custom_source_overrides() {
        let toml_str = r#"
[source]
host = "codeberg.org"
org = "forgejo"

[versions]
forgejo = "fff000 2024-01-02T00:00:00Z"
"#;
        let config: BookConfig = toml::from_str(toml_str).expect("parse");
        let versions = resolve_versions(&config).expect("resolve");
        assert_eq!(
            versions["forgejo"].base_url.as_str(),
            "https://codeberg.org/forgejo/forgejo/raw/fff000"
        );
    }

    #[test]
    fn default_config_roundtrip() {
        let config = BookConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: BookConfig = toml::from_str(&toml_str).expect("deserialize");
        assert!(parsed.versions.is_empty());
        assert_eq!(parsed.source.host, "github.com");
    }
}
