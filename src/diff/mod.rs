//! Line diffs and patch application.
//!
//! The engine computes pure line-level diffs at three granularities
//! (unified text, structured hunks, side-by-side rows) plus a change
//! summary. The patch module commits new content with a rename-based
//! backup; neither half ever touches the index.

pub mod engine;
pub mod patch;

pub use engine::{
    DiffHunk, DiffSummary, HunkKind, RowKind, SideBySideRow, change_summary, hunk_list,
    side_by_side, unified_diff,
};
pub use patch::{PatchError, PatchOutcome};
