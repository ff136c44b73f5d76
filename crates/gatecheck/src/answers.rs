//! Mutable answer store for a single form instance.
//!
//! The store is the source of truth for the form's current state. It owns
//! the dependency bookkeeping: setting a gating question's answer clears
//! every dependent answer, so a stale reason code from a previous domain can
//! never be submitted.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{Error, Result};

/// Whether a question currently requires an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    /// The question has no dependency, or its prerequisite is answered.
    Active,
    /// The question's prerequisite is unanswered; no answer is required
    /// and none may be stored.
    Inactive,
}

/// Mapping from question key to the current answer value.
///
/// Created empty on form mount, mutated on every user interaction, and
/// discarded (or [`reset`](AnswerStore::reset)) on navigation away or
/// successful submission. One store per form instance; no state crosses
/// instances.
#[derive(Debug, Clone)]
pub struct AnswerStore {
    catalog: Arc<Catalog>,
    answers: HashMap<String, String>,
}

impl AnswerStore {
    /// Create an empty store over the given catalog.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            answers: HashMap::new(),
        }
    }

    /// The catalog this store answers against.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The status of a question given the current answers.
    ///
    /// Unknown keys are reported `Inactive`; mutation paths reject them
    /// with an error instead.
    #[must_use]
    pub fn status(&self, key: &str) -> QuestionStatus {
        let Some(question) = self.catalog.get(key) else {
            return QuestionStatus::Inactive;
        };
        match &question.depends_on {
            Some(prerequisite) if !self.answers.contains_key(prerequisite) => {
                QuestionStatus::Inactive
            }
            _ => QuestionStatus::Active,
        }
    }

    /// Replace or insert the answer for `key`.
    ///
    /// Setting a question that other questions depend on clears those
    /// dependents' answers in the same call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownQuestion`] for keys outside the catalog,
    /// [`Error::QuestionInactive`] when the question's prerequisite is
    /// unanswered, and [`Error::AnswerNotPermitted`] when the value is
    /// outside the question's currently effective domain.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let question = self
            .catalog
            .get(key)
            .ok_or_else(|| Error::unknown_question(key))?;

        let prerequisite_answer = match &question.depends_on {
            Some(prerequisite) => match self.answers.get(prerequisite) {
                Some(answer) => Some(answer.clone()),
                None => return Err(Error::question_inactive(key, prerequisite)),
            },
            None => None,
        };

        let domain = question.effective_domain(prerequisite_answer.as_deref());
        if !domain.contains(&value) {
            return Err(Error::answer_not_permitted(key, value));
        }

        self.answers.insert(key.to_string(), value);
        debug!(question = key, "answer set");

        // Explicit dependency edges: a prerequisite change invalidates every
        // dependent answer, whether or not the new domain would admit it.
        for dependent in self.catalog.dependents_of(key) {
            if self.answers.remove(&dependent.key).is_some() {
                debug!(
                    question = %dependent.key,
                    prerequisite = key,
                    "dependent answer cleared"
                );
            }
        }

        Ok(())
    }

    /// Remove the answer for `key`, along with any dependent answers.
    ///
    /// Clearing an unanswered or unknown key is a no-op.
    pub fn clear(&mut self, key: &str) {
        if self.answers.remove(key).is_some() {
            debug!(question = key, "answer cleared");
        }
        for dependent in self.catalog.dependents_of(key) {
            if self.answers.remove(&dependent.key).is_some() {
                debug!(
                    question = %dependent.key,
                    prerequisite = key,
                    "dependent answer cleared"
                );
            }
        }
    }

    /// The current answer for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.answers.get(key).map(String::as_str)
    }

    /// Snapshot of all current answers.
    #[must_use]
    pub fn all(&self) -> BTreeMap<String, String> {
        self.answers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of stored answers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Check whether the store holds no answers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Wipe all answers (after a successful submission).
    pub fn reset(&mut self) {
        self.answers.clear();
        debug!("answer store reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::security_catalog;

    fn store() -> AnswerStore {
        AnswerStore::new(Arc::new(security_catalog()))
    }

    #[test]
    fn test_set_and_get() {
        let mut store = store();
        store.set("bodyDamagePojo", "no").unwrap();
        assert_eq!(store.get("bodyDamagePojo"), Some("no"));
        assert_eq!(store.get("roofLeakPojo"), None);
    }

    #[test]
    fn test_set_unknown_key() {
        let mut store = store();
        let result = store.set("bogus", "yes");
        assert!(matches!(result, Err(Error::UnknownQuestion { .. })));
    }

    #[test]
    fn test_set_rejects_out_of_domain_value() {
        let mut store = store();
        let result = store.set("bodyDamagePojo", "maybe");
        assert!(matches!(result, Err(Error::AnswerNotPermitted { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_dependent_inactive_until_prerequisite_answered() {
        let mut store = store();
        assert_eq!(
            store.status("gateEntryReasonPojo"),
            QuestionStatus::Inactive
        );

        let result = store.set("gateEntryReasonPojo", "Breakdown");
        assert!(matches!(result, Err(Error::QuestionInactive { .. })));

        store.set("gateEntryPojo", "in").unwrap();
        assert_eq!(store.status("gateEntryReasonPojo"), QuestionStatus::Active);
        store.set("gateEntryReasonPojo", "Breakdown").unwrap();
        assert_eq!(store.get("gateEntryReasonPojo"), Some("Breakdown"));
    }

    #[test]
    fn test_dependent_domain_follows_gate_direction() {
        let mut store = store();
        store.set("gateEntryPojo", "in").unwrap();

        // "Brake Test" only exists in the out-domain.
        let result = store.set("gateEntryReasonPojo", "Brake Test");
        assert!(matches!(result, Err(Error::AnswerNotPermitted { .. })));

        store.set("gateEntryPojo", "out").unwrap();
        store.set("gateEntryReasonPojo", "Brake Test").unwrap();
    }

    #[test]
    fn test_gate_scenario_from_canonical_use() {
        let mut store = store();

        store.set("gateEntryPojo", "in").unwrap();
        assert_eq!(
            store.all(),
            BTreeMap::from([("gateEntryPojo".to_string(), "in".to_string())])
        );

        store.set("gateEntryReasonPojo", "Fuel Filling").unwrap();
        assert_eq!(
            store.all(),
            BTreeMap::from([
                ("gateEntryPojo".to_string(), "in".to_string()),
                ("gateEntryReasonPojo".to_string(), "Fuel Filling".to_string()),
            ])
        );

        // Changing the gating answer clears the dependent reason.
        store.set("gateEntryPojo", "out").unwrap();
        assert_eq!(
            store.all(),
            BTreeMap::from([("gateEntryPojo".to_string(), "out".to_string())])
        );
    }

    #[test]
    fn test_regating_clears_even_shared_values() {
        let mut store = store();
        store.set("gateEntryPojo", "in").unwrap();
        store.set("gateEntryReasonPojo", "Normal Operation").unwrap();

        // "Normal Operation" exists in both domains, but the prerequisite
        // changed, so the answer must still be cleared.
        store.set("gateEntryPojo", "out").unwrap();
        assert_eq!(store.get("gateEntryReasonPojo"), None);
    }

    #[test]
    fn test_clear_cascades_to_dependents() {
        let mut store = store();
        store.set("gateEntryPojo", "in").unwrap();
        store.set("gateEntryReasonPojo", "Breakdown").unwrap();

        store.clear("gateEntryPojo");
        assert_eq!(store.get("gateEntryPojo"), None);
        assert_eq!(store.get("gateEntryReasonPojo"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_unanswered_is_noop() {
        let mut store = store();
        store.clear("bodyDamagePojo");
        store.clear("bogus");
        assert!(store.is_empty());
    }

    #[test]
    fn test_reset_wipes_everything() {
        let mut store = store();
        store.set("gateEntryPojo", "out").unwrap();
        store.set("bodyDamagePojo", "yes").unwrap();
        store.reset();
        assert!(store.all().is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_status_unknown_key_is_inactive() {
        let store = store();
        assert_eq!(store.status("bogus"), QuestionStatus::Inactive);
    }

    #[test]
    fn test_set_replaces_existing_answer() {
        let mut store = store();
        store.set("bodyDamagePojo", "yes").unwrap();
        store.set("bodyDamagePojo", "no").unwrap();
        assert_eq!(store.get("bodyDamagePojo"), Some("no"));
        assert_eq!(store.len(), 1);
    }
}
