//! The staging plan: which files each upstream project contributes.
//!
//! The plan is a hand-authored constant, walked in declaration order. Every
//! destination path must be unique across the whole plan; a collision is a
//! plan bug and surfaces as a `DuplicateEntry` error at run time.

use bookstage_fetch::TocLevel;

/// One document to fetch and register for a project.
#[derive(Debug, Clone, Copy)]
pub struct DocSpec {
    /// Path of the file within the upstream repository.
    pub source: &'static str,
    /// Destination path relative to the project's directory under `src/`.
    pub dest: &'static str,
    /// Display title for the `SUMMARY.md` entry.
    pub title: &'static str,
    /// Indentation level of the entry.
    pub level: TocLevel,
}

/// All staged files of one upstream project.
#[derive(Debug, Clone, Copy)]
pub struct ProjectPlan {
    /// Project name; doubles as the repository name and the directory name
    /// under `src/`.
    pub name: &'static str,
    /// Primary documents, fetched in order.
    pub docs: &'static [DocSpec],
    /// Legal files (repo-root paths), deferred to the end of the run and
    /// staged under `license/<name>/<FILE>.md`.
    pub legal: &'static [&'static str],
}

const fn doc(
    source: &'static str,
    dest: &'static str,
    title: &'static str,
    level: TocLevel,
) -> DocSpec {
    DocSpec {
        source,
        dest,
        title,
        level,
    }
}

/// The default staging plan, in the order the projects appear in the book.
pub const DEFAULT_PLAN: &[ProjectPlan] = &[
    ProjectPlan {
        name: "typst",
        docs: &[
            doc("README.md", "index.md", "Typst", TocLevel::Top),
            doc(
                "docs/dev/architecture.md",
                "dev/architecture.md",
                "Compiler architecture",
                TocLevel::Nested,
            ),
        ],
        legal: &["LICENSE", "NOTICE"],
    },
    ProjectPlan {
        name: "codex",
        docs: &[
            doc("README.md", "index.md", "Codex", TocLevel::Top),
            doc("CHANGELOG.md", "changelog.md", "Changelog", TocLevel::Nested),
        ],
        legal: &["LICENSE"],
    },
    ProjectPlan {
        name: "hayagriva",
        docs: &[
            doc("README.md", "index.md", "Hayagriva", TocLevel::Top),
            doc(
                "docs/file-format.md",
                "file-format.md",
                "YAML format",
                TocLevel::Nested,
            ),
            doc(
                "docs/selectors.md",
                "selectors.md",
                "Bibliography selectors",
                TocLevel::Nested,
            ),
            doc("CHANGELOG.md", "changelog.md", "Changelog", TocLevel::Nested),
        ],
        legal: &["LICENSE-MIT", "LICENSE-APACHE", "NOTICE"],
    },
    ProjectPlan {
        name: "packages",
        docs: &[
            doc("README.md", "index.md", "Packages", TocLevel::Top),
            doc(
                "docs/README.md",
                "submission.md",
                "Submission guidelines",
                TocLevel::Nested,
            ),
            doc(
                "docs/manifest.md",
                "manifest.md",
                "Package manifest",
                TocLevel::Nested,
            ),
            doc("docs/typst.md", "typst.md", "Typst files", TocLevel::Nested),
            doc(
                "docs/resources.md",
                "resources.md",
                "Images, fonts and other assets",
                TocLevel::Nested,
            ),
            doc(
                "docs/documentation.md",
                "documentation.md",
                "The README file, and documentation in general",
                TocLevel::Nested,
            ),
            doc("docs/licensing.md", "licensing.md", "Licensing", TocLevel::Nested),
            doc("docs/tips.md", "tips.md", "Further tips", TocLevel::Nested),
            doc(
                "docs/CATEGORIES.md",
                "categories.md",
                "List of categories",
                TocLevel::Nested,
            ),
            doc(
                "docs/DISCIPLINES.md",
                "disciplines.md",
                "List of disciplines",
                TocLevel::Nested,
            ),
        ],
        legal: &["LICENSE"],
    },
];
