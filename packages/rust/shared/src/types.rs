//! Core domain types for Bookstage staging runs.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

// ---------------------------------------------------------------------------
// ProjectVersion
// ---------------------------------------------------------------------------

/// A resolved pinned revision of one upstream project.
///
/// Derived from a `[versions]` config entry of the form
/// `"<revisionId> <timestamp>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectVersion {
    /// The pinned revision identifier (e.g., a commit hash).
    pub revision: String,
    /// The revision's author timestamp, normalized to a UTC calendar date.
    pub author_date: NaiveDate,
    /// Raw-content base URL for the revision:
    /// `https://<host>/<org>/<project>/raw/<revision>`.
    pub base_url: Url,
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// The `meta.json` structure written next to `SUMMARY.md`.
///
/// Field order is the serialization order: `dates` before `map`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Per-project author dates, keyed by the permalink (blob) base URL.
    pub dates: BTreeMap<String, NaiveDate>,
    /// Local document path → canonical (blob-form) source URL.
    pub map: BTreeMap<String, String>,
}
