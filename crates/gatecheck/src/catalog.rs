//! Declarative question catalog.
//!
//! This module defines the questionnaire model: questions with a key, a
//! display label, a domain of permitted answers, and an optional dependency
//! on a prerequisite question. Dependencies are explicit edges evaluated on
//! every mutation of the answer store, never inline handler logic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The enumerated set of permitted answer values for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    values: Vec<String>,
}

impl Domain {
    /// Create a domain from a list of permitted values.
    #[must_use]
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The yes/no domain used by condition questions.
    #[must_use]
    pub fn yes_no() -> Self {
        Self::one_of(["yes", "no"])
    }

    /// Check whether a value belongs to this domain.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// The permitted values, in declaration order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// A function selecting a dependent question's domain from its
/// prerequisite's answer.
pub type DomainSelector = fn(&str) -> Domain;

/// A single question in a catalog.
#[derive(Debug, Clone)]
pub struct Question {
    /// Unique key within the catalog; also the wire field name.
    pub key: String,
    /// Display text.
    pub label: String,
    /// Permitted answer values when no selector applies.
    pub domain: Domain,
    /// Key of the prerequisite question, if any.
    pub depends_on: Option<String>,
    /// Maps the prerequisite's answer to this question's effective domain.
    pub domain_selector: Option<DomainSelector>,
}

impl Question {
    /// Create an independent question.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, domain: Domain) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            domain,
            depends_on: None,
            domain_selector: None,
        }
    }

    /// Make this question depend on a prerequisite, with a selector that
    /// derives the effective domain from the prerequisite's answer.
    #[must_use]
    pub fn depending_on(mut self, prerequisite: impl Into<String>, selector: DomainSelector) -> Self {
        self.depends_on = Some(prerequisite.into());
        self.domain_selector = Some(selector);
        self
    }

    /// The domain in effect given the prerequisite's current answer.
    ///
    /// Falls back to the declared domain for independent questions or when
    /// the prerequisite is unanswered.
    #[must_use]
    pub fn effective_domain(&self, prerequisite_answer: Option<&str>) -> Domain {
        match (self.domain_selector, prerequisite_answer) {
            (Some(select), Some(answer)) => select(answer),
            _ => self.domain.clone(),
        }
    }
}

/// An immutable, ordered question catalog.
///
/// Loaded once per form instance; every key is unique.
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<Question>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateQuestionKey`] if two questions share a key.
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        let mut index = HashMap::with_capacity(questions.len());
        for (i, question) in questions.iter().enumerate() {
            if index.insert(question.key.clone(), i).is_some() {
                return Err(Error::duplicate_question_key(&question.key));
            }
        }
        Ok(Self { questions, index })
    }

    /// The questions, in catalog order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Look up a question by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Question> {
        self.index.get(key).map(|&i| &self.questions[i])
    }

    /// All questions that declare `key` as their prerequisite.
    #[must_use]
    pub fn dependents_of(&self, key: &str) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.depends_on.as_deref() == Some(key))
            .collect()
    }

    /// Number of questions in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Check whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Reason codes offered when a vehicle comes in through the gate.
fn gate_in_reasons() -> Domain {
    Domain::one_of(["Breakdown", "Fuel Filling", "Normal Operation"])
}

/// Reason codes offered when a vehicle goes out through the gate.
fn gate_out_reasons() -> Domain {
    Domain::one_of([
        "FC",
        "PRD",
        "Brake Test",
        "Charted Trip",
        "TVS",
        "Special Operation",
        "Normal Operation",
    ])
}

/// Selects the reason-code domain from the gate direction.
fn gate_reason_selector(gate_answer: &str) -> Domain {
    if gate_answer == "in" {
        gate_in_reasons()
    } else {
        gate_out_reasons()
    }
}

/// The canonical security inspection questionnaire.
///
/// The gate-entry question gates the reason code: its answer selects which
/// reason domain applies, and changing it clears any previously chosen
/// reason. The remaining questions are independent yes/no condition checks.
/// Keys double as the backend's wire field names.
#[must_use]
pub fn security_catalog() -> Catalog {
    let questions = vec![
        Question::new("gateEntryPojo", "Gate Entry", Domain::one_of(["in", "out"])),
        Question::new(
            "gateEntryReasonPojo",
            "Gate Entry Reason",
            gate_out_reasons(),
        )
        .depending_on("gateEntryPojo", gate_reason_selector),
        Question::new("bodyDamagePojo", "Body Damage", Domain::yes_no()),
        Question::new("glassesDamagePojo", "Glasses Damage", Domain::yes_no()),
        Question::new("platformDamagePojo", "Platform Damage", Domain::yes_no()),
        Question::new("seatAssyDamagePojo", "Seat Assembly Damage", Domain::yes_no()),
        Question::new("seatCushionDamagePojo", "Seat Cushion Damage", Domain::yes_no()),
        Question::new("roofLeakPojo", "Roof Leakage", Domain::yes_no()),
        Question::new("insideCleaningPojo", "Inside Cleaning", Domain::yes_no()),
        Question::new("outsideCleaningPojo", "Outside Cleaning", Domain::yes_no()),
        Question::new("missingPropertyPojo", "Missing Property", Domain::yes_no()),
    ];

    // Keys are static and distinct; build the index directly.
    let index = questions
        .iter()
        .enumerate()
        .map(|(i, q)| (q.key.clone(), i))
        .collect();
    Catalog { questions, index }
}
