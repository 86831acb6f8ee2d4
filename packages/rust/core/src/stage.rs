//! The staging driver: walk the plan, flush legal files, emit artifacts.
//!
//! Control flow is strictly sequential. Any error aborts the run before
//! `SUMMARY.md` and `meta.json` are written; files downloaded up to that
//! point stay on disk, so a re-run resumes via the skip-if-exists check.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use bookstage_fetch::{Registry, TocLevel, build_client, fetch_and_register, legal_title, permalink};
use bookstage_shared::{BookstageError, Manifest, ProjectVersion, Result};

use crate::plan::ProjectPlan;

/// Fixed `SUMMARY.md` heading that precedes the legal entries.
const LICENSES_HEADING: &str = "- [Licenses](./licenses.md)";

/// Summary of a completed staging run.
#[derive(Debug)]
pub struct StageReport {
    /// Path of the staged source tree (`<root>/src`).
    pub src_dir: PathBuf,
    /// Number of registered documents (primary + legal).
    pub documents: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Run the full staging sequence against `root`.
///
/// 1. Copy the book's `README.md` to `src/index.md`
/// 2. Fetch and register each project's documents, in plan order
/// 3. Flush the deferred legal files under a single `Licenses` heading
/// 4. Write `SUMMARY.md` and `meta.json`
#[instrument(skip_all, fields(root = %root.display(), projects = plan.len()))]
pub async fn stage(
    versions: &BTreeMap<String, ProjectVersion>,
    plan: &[ProjectPlan],
    root: &Path,
) -> Result<StageReport> {
    let start = Instant::now();

    let src_dir = root.join("src");
    std::fs::create_dir_all(&src_dir).map_err(|e| BookstageError::io(&src_dir, e))?;

    // The book's own README becomes the introduction chapter.
    let readme = root.join("README.md");
    std::fs::copy(&readme, src_dir.join("index.md"))
        .map_err(|e| BookstageError::io(&readme, e))?;

    let mut registry = Registry::new(&src_dir);
    let client = build_client()?;

    for project in plan {
        let version = versions.get(project.name).ok_or_else(|| {
            BookstageError::config(format!("no pinned version for project '{}'", project.name))
        })?;

        info!(
            project = project.name,
            revision = %version.revision,
            docs = project.docs.len(),
            "staging project"
        );

        let project_dir = src_dir.join(project.name);
        for d in project.docs {
            let url = format!("{}/{}", version.base_url, d.source);
            let dest = project_dir.join(d.dest);
            fetch_and_register(&client, &mut registry, &url, &dest, d.title, d.level).await?;
        }

        for file in project.legal {
            let url = format!("{}/{}", version.base_url, file);
            let dest = src_dir.join("license").join(project.name).join(format!("{file}.md"));
            registry.defer_legal(url, dest);
        }
    }

    // The Licenses section always comes last, regardless of plan order.
    registry.push_line(LICENSES_HEADING);
    for legal in registry.take_legal() {
        let title = legal_title(&legal.dest);
        fetch_and_register(
            &client,
            &mut registry,
            &legal.source_url,
            &legal.dest,
            &title,
            TocLevel::Nested,
        )
        .await?;
    }

    let documents = registry.map().len();
    emit(&registry, versions, plan, &src_dir)?;

    let report = StageReport {
        src_dir,
        documents,
        elapsed: start.elapsed(),
    };

    info!(
        documents = report.documents,
        elapsed_ms = report.elapsed.as_millis(),
        "staging complete"
    );

    Ok(report)
}

/// Write `SUMMARY.md` and `meta.json`, each as a full-content overwrite.
fn emit(
    registry: &Registry,
    versions: &BTreeMap<String, ProjectVersion>,
    plan: &[ProjectPlan],
    src_dir: &Path,
) -> Result<()> {
    let summary_path = src_dir.join("SUMMARY.md");
    std::fs::write(&summary_path, registry.summary_text())
        .map_err(|e| BookstageError::io(&summary_path, e))?;

    let mut manifest = Manifest {
        map: registry.map().clone(),
        ..Default::default()
    };
    for project in plan {
        if let Some(version) = versions.get(project.name) {
            manifest
                .dates
                .insert(permalink(version.base_url.as_str()), version.author_date);
        }
    }

    let json = serde_json::to_string(&manifest).map_err(|e| BookstageError::Json(e.to_string()))?;
    let meta_path = src_dir.join("meta.json");
    std::fs::write(&meta_path, json).map_err(|e| BookstageError::io(&meta_path, e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
