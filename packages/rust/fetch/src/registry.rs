//! Registry state for a staging run.
//!
//! The registry accumulates three things, all in call order:
//! - the `SUMMARY.md` line buffer,
//! - the deferred legal-file queue (flushed once, after all primary docs),
//! - the local-path → canonical-URL map for `meta.json`.
//!
//! Registration is unconditional: it happens whether or not the document's
//! content was freshly downloaded or already on disk, so manifest
//! completeness never depends on cache state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bookstage_shared::{BookstageError, Result};

// ---------------------------------------------------------------------------
// TocLevel
// ---------------------------------------------------------------------------

/// Indentation level of a `SUMMARY.md` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocLevel {
    /// Unindented top-level entry (a project's index page).
    Top,
    /// Two-space-indented entry nested under the preceding top entry.
    Nested,
}

impl TocLevel {
    fn indent(self) -> &'static str {
        match self {
            TocLevel::Top => "",
            TocLevel::Nested => "  ",
        }
    }
}

// ---------------------------------------------------------------------------
// LegalFile
// ---------------------------------------------------------------------------

/// A deferred license/notice fetch request, queued during per-project
/// processing and resolved after all primary documents.
#[derive(Debug, Clone)]
pub struct LegalFile {
    /// Raw-content URL to fetch.
    pub source_url: String,
    /// Destination path under the source root.
    pub dest: PathBuf,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Mutable per-run registry, threaded through the driver and every
/// fetch-and-register call. Constructed at run start, discarded at run end.
#[derive(Debug)]
pub struct Registry {
    /// Root of the staged source tree; local paths are relative to it.
    src_dir: PathBuf,
    /// Lines of `SUMMARY.md`, in emission order.
    summary: Vec<String>,
    /// Deferred legal files, in enqueue order across all projects.
    legal: Vec<LegalFile>,
    /// Local path → canonical (blob-form) source URL.
    map: BTreeMap<String, String>,
}

impl Registry {
    /// Create a registry rooted at `src_dir`, seeded with the fixed
    /// `SUMMARY.md` header (title, introduction link, and the blank line
    /// required before indented entries).
    pub fn new(src_dir: impl Into<PathBuf>) -> Self {
        Self {
            src_dir: src_dir.into(),
            summary: vec![
                "# Summary".to_string(),
                "[Introduction](./index.md)".to_string(),
                String::new(),
            ],
            legal: Vec::new(),
            map: BTreeMap::new(),
        }
    }

    /// Record a document: append its `SUMMARY.md` line and its manifest map
    /// entry. Returns the computed local path.
    ///
    /// A duplicate local path is a staging-plan bug and fails with
    /// [`BookstageError::DuplicateEntry`] before any other side effect.
    pub fn register(
        &mut self,
        source_url: &str,
        dest: &Path,
        title: &str,
        level: TocLevel,
    ) -> Result<String> {
        let local = self.local_path(dest)?;

        if self.map.contains_key(&local) {
            return Err(BookstageError::duplicate(&local));
        }

        self.summary
            .push(format!("{}- [{title}](./{local})", level.indent()));
        self.map.insert(local.clone(), permalink(source_url));

        Ok(local)
    }

    /// Append a raw `SUMMARY.md` line (used for the `Licenses` heading).
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.summary.push(line.into());
    }

    /// Queue a legal file for the end-of-run flush.
    pub fn defer_legal(&mut self, source_url: impl Into<String>, dest: impl Into<PathBuf>) {
        self.legal.push(LegalFile {
            source_url: source_url.into(),
            dest: dest.into(),
        });
    }

    /// Drain the deferred legal files, preserving enqueue order.
    pub fn take_legal(&mut self) -> Vec<LegalFile> {
        std::mem::take(&mut self.legal)
    }

    /// The full `SUMMARY.md` content: all lines joined by `\n`, with a
    /// trailing newline.
    pub fn summary_text(&self) -> String {
        let mut text = self.summary.join("\n");
        text.push('\n');
        text
    }

    /// The accumulated local-path → canonical-URL map.
    pub fn map(&self) -> &BTreeMap<String, String> {
        &self.map
    }

    /// Compute `dest` relative to the source root, in forward-slash form.
    fn local_path(&self, dest: &Path) -> Result<String> {
        let rel = dest.strip_prefix(&self.src_dir).map_err(|_| {
            BookstageError::config(format!(
                "destination {} is outside the source root {}",
                dest.display(),
                self.src_dir.display()
            ))
        })?;

        Ok(rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"))
    }
}

// ---------------------------------------------------------------------------
// URL / title helpers
// ---------------------------------------------------------------------------

/// Rewrite a raw-content URL into its browsable permalink form by replacing
/// the first `/raw/` path segment with `/blob/`.
///
/// Revision ids are hashes and cannot contain a path separator, so the
/// first occurrence is always the segment between repo and revision.
pub fn permalink(raw_url: &str) -> String {
    raw_url.replacen("/raw/", "/blob/", 1)
}

/// Title for a legal-file ToC entry: `"<ParentDirName Titlecased>: <stem>"`.
pub fn legal_title(dest: &Path) -> String {
    let parent = dest
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    format!("{}: {stem}", title_case(&parent))
}

/// Uppercase the first letter of each word, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::new("/book/src")
    }

    #[test]
    fn summary_header_seeded() {
        let reg = registry();
        let text = reg.summary_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# Summary");
        assert_eq!(lines[1], "[Introduction](./index.md)");
        assert_eq!(lines[2], "");
    }

    #[test]
    fn toc_lines_in_call_order_with_indentation() {
        let mut reg = registry();
        reg.register("https://h/o/r/raw/v/a.md", Path::new("/book/src/a.md"), "A", TocLevel::Top)
            .unwrap();
        reg.register("https://h/o/r/raw/v/b.md", Path::new("/book/src/b.md"), "B", TocLevel::Nested)
            .unwrap();
        reg.register("https://h/o/r/raw/v/c.md", Path::new("/book/src/c.md"), "C", TocLevel::Nested)
            .unwrap();

        let text = reg.summary_text();
        let lines: Vec<&str> = text.lines().skip(3).map(str::trim_end).collect();
        assert_eq!(
            lines,
            vec!["- [A](./a.md)", "  - [B](./b.md)", "  - [C](./c.md)"]
        );
    }

    #[test]
    fn register_records_permalink_form() {
        let mut reg = registry();
        reg.register(
            "https://host/org/repo/raw/abc123/README.md",
            Path::new("/book/src/repo/index.md"),
            "Repo",
            TocLevel::Top,
        )
        .unwrap();

        assert_eq!(
            reg.map()["repo/index.md"],
            "https://host/org/repo/blob/abc123/README.md"
        );
    }

    #[test]
    fn duplicate_local_path_rejected() {
        let mut reg = registry();
        let dest = Path::new("/book/src/typst/index.md");
        reg.register("https://h/o/typst/raw/v1/README.md", dest, "Typst", TocLevel::Top)
            .unwrap();

        // A different source URL does not excuse a duplicate destination.
        let err = reg
            .register("https://h/o/typst/raw/v2/README.md", dest, "Typst", TocLevel::Top)
            .unwrap_err();
        assert!(matches!(err, BookstageError::DuplicateEntry { .. }));
        assert!(err.to_string().contains("typst/index.md"));
    }

    #[test]
    fn destination_outside_root_rejected() {
        let mut reg = registry();
        let err = reg
            .register("https://h/o/r/raw/v/x.md", Path::new("/elsewhere/x.md"), "X", TocLevel::Top)
            .unwrap_err();
        assert!(matches!(err, BookstageError::Config { .. }));
    }

    #[test]
    fn legal_queue_preserves_order() {
        let mut reg = registry();
        reg.defer_legal("https://h/o/p1/raw/v/LICENSE", "/book/src/license/p1/LICENSE.md");
        reg.defer_legal("https://h/o/p2/raw/v/LICENSE", "/book/src/license/p2/LICENSE.md");

        let legal = reg.take_legal();
        assert_eq!(legal.len(), 2);
        assert!(legal[0].source_url.contains("/p1/"));
        assert!(legal[1].source_url.contains("/p2/"));

        // Drained: a second take yields nothing.
        assert!(reg.take_legal().is_empty());
    }

    #[test]
    fn permalink_rewrites_first_raw_segment() {
        assert_eq!(
            permalink("https://host/org/repo/raw/abc123/README.md"),
            "https://host/org/repo/blob/abc123/README.md"
        );
        // Later occurrences stay untouched
        assert_eq!(
            permalink("https://host/org/repo/raw/abc/docs/raw/notes.md"),
            "https://host/org/repo/blob/abc/docs/raw/notes.md"
        );
    }

    #[test]
    fn legal_titles_derived_from_path() {
        assert_eq!(
            legal_title(Path::new("/book/src/license/typst/LICENSE.md")),
            "Typst: LICENSE"
        );
        assert_eq!(
            legal_title(Path::new("/book/src/license/hayagriva/LICENSE-MIT.md")),
            "Hayagriva: LICENSE-MIT"
        );
    }

    #[test]
    fn title_case_capitalizes_words() {
        assert_eq!(title_case("typst"), "Typst");
        assert_eq!(title_case("my-packages"), "My-Packages");
        assert_eq!(title_case("ALLCAPS"), "Allcaps");
    }
}
