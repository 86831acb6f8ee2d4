//! Idempotent fetch-and-register: the one operation driving a staging run.
//!
//! Given a source URL and a destination path, [`fetch_and_register`] makes
//! sure the file exists locally (downloading it once if absent) and records
//! it in the [`Registry`] unconditionally. The skip-if-exists check makes
//! re-runs resume where an aborted run left off.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use tracing::{debug, info, instrument};

use bookstage_shared::{BookstageError, Result};

pub mod registry;

pub use registry::{LegalFile, Registry, TocLevel, legal_title, permalink};

/// User-Agent string for staging requests.
const USER_AGENT: &str = concat!("Bookstage/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Per-request timeout in seconds. Exceeding it is fatal, never retried.
const TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Client construction
// ---------------------------------------------------------------------------

/// Build the HTTP client used for every fetch in a run.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .build()
        .map_err(|e| BookstageError::fetch(format!("failed to build HTTP client: {e}")))
}

// ---------------------------------------------------------------------------
// Fetch-and-register
// ---------------------------------------------------------------------------

/// Ensure `dest` exists locally and register it under `title`.
///
/// Registration (ToC line, manifest map entry, duplicate check) always
/// happens, even when the file is already on disk. Only the network access
/// and the file write are skipped on a cache hit.
#[instrument(skip_all, fields(url = %source_url))]
pub async fn fetch_and_register(
    client: &Client,
    registry: &mut Registry,
    source_url: &str,
    dest: &Path,
    title: &str,
    level: TocLevel,
) -> Result<()> {
    let local = registry.register(source_url, dest, title, level)?;

    if dest.exists() {
        info!(path = %local, "skip downloading, already exists");
        return Ok(());
    }

    info!(path = %local, "downloading");

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| BookstageError::io(parent, e))?;
    }

    let response = client
        .get(source_url)
        .send()
        .await
        .map_err(|e| BookstageError::fetch(format!("{source_url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BookstageError::fetch(format!("{source_url}: HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| BookstageError::fetch(format!("{source_url}: body read failed: {e}")))?;

    let body = normalize_markdown(&body);
    std::fs::write(dest, body.as_bytes()).map_err(|e| BookstageError::io(dest, e))?;

    debug!(path = %local, bytes = body.len(), "written");
    Ok(())
}

// ---------------------------------------------------------------------------
// Markdown normalization
// ---------------------------------------------------------------------------

/// Collapse the one known broken reference link in upstream content.
///
/// A `[local packages]` link wrapped across a line break would be merged
/// incorrectly by downstream markdown re-serialization, so join it back
/// onto one line. Nothing else in the body is touched.
fn normalize_markdown(body: &str) -> String {
    static BROKEN_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\[local[ \t]*\n[ \t]*packages\]").expect("valid regex")
    });

    BROKEN_REF_RE.replace_all(body, "[local packages]").into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
