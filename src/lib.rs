//! sprint-import: publish markdown sprint plans as issue-tracker epics and tasks.
//!
//! Sprint documents live in a sources directory as `sprint_*.md` files. Each
//! one is parsed into a sprint with epics and tasks, then published in order:
//! every epic first, then its tasks under the epic's remote key.
//!
//! ## Layout
//!
//! - [`sprint`] - document model, label grammar, field extraction, epic resolution
//! - [`tracker`] - the `Publisher` seam with Jira and stub backends
//! - [`sync`] - document loading, the publishing orchestrator, run statistics
//! - [`report`] - previews, creation summaries, validation reports
//! - [`config`] - `sprint-import.toml`, environment, and CLI flags
//! - [`log`] - the rotating run log

pub mod color;
pub mod config;
pub mod log;
pub mod report;
pub mod sprint;
pub mod sync;
pub mod testutil;
pub mod tracker;
