//! Baseline-vs-current diffing for the reconciliation pass.

mod batch;
mod diff_kind;
mod equivalence;
mod event_diff;

pub use batch::MutationBatch;
pub use diff_kind::DiffKind;
pub use equivalence::{events_equivalent, reminders_equivalent};
pub use event_diff::EventDiff;
