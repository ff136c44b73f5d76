//! Form validation engine.
//!
//! A pure predicate over the answer store and the free-text remarks. It is
//! re-evaluated on every mutation; the submit affordance is enabled if and
//! only if the latest evaluation returned `true`.

use crate::answers::{AnswerStore, QuestionStatus};

/// Remarks must be strictly longer than this many characters.
pub const MIN_REMARKS_CHARS: usize = 5;

/// Check whether the form is complete and valid.
///
/// Valid iff every active question has a non-empty answer and the remarks
/// exceed [`MIN_REMARKS_CHARS`] characters. Pure and idempotent: the same
/// `(answers, remarks)` pair always yields the same result, and nothing is
/// mutated.
#[must_use]
pub fn is_valid(store: &AnswerStore, remarks: &str) -> bool {
    missing_answers(store).is_empty() && remarks_valid(remarks)
}

/// Check the remarks length rule in isolation.
#[must_use]
pub fn remarks_valid(remarks: &str) -> bool {
    remarks.chars().count() > MIN_REMARKS_CHARS
}

/// Keys of active questions that are still unanswered or empty.
///
/// Empty when the questionnaire part of the form is complete. Inactive
/// dependents are not required and never appear here.
#[must_use]
pub fn missing_answers(store: &AnswerStore) -> Vec<String> {
    store
        .catalog()
        .questions()
        .iter()
        .filter(|q| store.status(&q.key) == QuestionStatus::Active)
        .filter(|q| store.get(&q.key).map_or(true, str::is_empty))
        .map(|q| q.key.clone())
        .collect()
}
