//! Core staging pipeline for Bookstage.
//!
//! This crate holds the fixed staging plan (which documents each upstream
//! project contributes) and the driver that walks it: fetch every document,
//! flush the deferred legal files, then emit `SUMMARY.md` and `meta.json`.

pub mod plan;
pub mod stage;
