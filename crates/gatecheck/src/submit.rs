//! Submission pipeline and per-form session state machine.
//!
//! On submit the pipeline snapshots the answer store and context into a
//! single flat payload, posts it with the caller's bearer credential, and
//! interprets the outcome. At most one submission per pipeline is ever in
//! flight; a second submit while one is pending is a silent no-op, never a
//! queue. All failures are caught at this boundary and converted into the
//! `Failure` state plus a notification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::answers::AnswerStore;
use crate::catalog::Catalog;
use crate::context::{format_timestamp, Clock, LocationProvider, StaffIdentity, SubmissionContext};
use crate::error::{Error, Result};
use crate::notify::{Navigator, NoticeKind, Notifier};
use crate::validate::{is_valid, missing_answers, remarks_valid};

/// Wire field name for the remarks.
const FIELD_ADDITIONAL_INFO: &str = "additionalInfo";
/// Wire field name for the staff number.
const FIELD_STAFF_NUMBER: &str = "staffNumber";
/// Wire field name for the staff name.
const FIELD_STAFF_NAME: &str = "staffName";
/// Wire field name for the fleet number.
const FIELD_FLEET_NUMBER: &str = "fleetNumber";
/// Wire field name for the latitude.
const FIELD_LATITUDE: &str = "latitude";
/// Wire field name for the longitude.
const FIELD_LONGITUDE: &str = "longitude";
/// Wire field name for the submission timestamp.
const FIELD_DATE_AND_TIME: &str = "dateAndTime";

/// The flattened record sent to the backend.
///
/// The union of all active questions' answers, the remarks, and the
/// submission context under fixed field names. Only constructible from a
/// valid form.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct SubmissionPayload {
    fields: Map<String, Value>,
}

impl SubmissionPayload {
    /// Assemble a payload from the form state and context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationBlocked`] when any active question is
    /// unanswered or the remarks are too short. Reaching this error means
    /// the caller failed to gate the submit affordance on the validation
    /// engine.
    pub fn assemble(
        store: &AnswerStore,
        remarks: &str,
        context: &SubmissionContext,
        timestamp: NaiveDateTime,
    ) -> Result<Self> {
        if !is_valid(store, remarks) {
            let reason = if remarks_valid(remarks) {
                format!("unanswered questions: {}", missing_answers(store).join(", "))
            } else {
                "remarks too short".to_string()
            };
            return Err(Error::validation_blocked(reason));
        }

        let mut fields = Map::new();
        for (key, value) in store.all() {
            fields.insert(key, Value::String(value));
        }
        fields.insert(
            FIELD_ADDITIONAL_INFO.to_string(),
            Value::String(remarks.to_string()),
        );
        fields.insert(
            FIELD_STAFF_NUMBER.to_string(),
            Value::String(context.staff_number.clone()),
        );
        fields.insert(
            FIELD_STAFF_NAME.to_string(),
            Value::String(context.staff_name.clone()),
        );
        fields.insert(
            FIELD_FLEET_NUMBER.to_string(),
            Value::String(context.fleet_number.clone()),
        );
        fields.insert(FIELD_LATITUDE.to_string(), json_number(context.latitude));
        fields.insert(FIELD_LONGITUDE.to_string(), json_number(context.longitude));
        fields.insert(
            FIELD_DATE_AND_TIME.to_string(),
            Value::String(format_timestamp(timestamp)),
        );

        Ok(Self { fields })
    }

    /// The value of a payload field, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Number of fields in the payload.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the payload is empty (it never is once assembled).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// Outcome of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the submission.
    Accepted,
    /// The backend responded with an empty body.
    Rejected,
    /// The backend was unreachable or returned a non-success status.
    Failed,
    /// A prior submission is still in flight; nothing was sent.
    AlreadyInFlight,
}

/// Transport seam for posting a payload to the backend.
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    /// Post the payload with the given bearer credential, returning the raw
    /// response body.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is unreachable or responds with a
    /// non-success status.
    async fn post(&self, payload: &SubmissionPayload, bearer: &str) -> Result<String>;
}

/// HTTP transport over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Create a transport posting to the given submission endpoint URL.
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl SubmitTransport for HttpTransport {
    async fn post(&self, payload: &SubmissionPayload, bearer: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(bearer)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        Ok(body)
    }
}

/// Sends assembled payloads and enforces the at-most-one-in-flight rule.
///
/// The in-flight flag is exclusively owned by the pipeline and mutated only
/// here.
pub struct SubmitPipeline {
    transport: Arc<dyn SubmitTransport>,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for SubmitPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitPipeline")
            .field("in_flight", &self.is_in_flight())
            .finish_non_exhaustive()
    }
}

impl SubmitPipeline {
    /// Create a pipeline over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn SubmitTransport>) -> Self {
        Self {
            transport,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Check whether a submission is currently in flight.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Send a payload to the backend.
    ///
    /// A call arriving while another submission is in flight returns
    /// [`SubmitOutcome::AlreadyInFlight`] without touching the network.
    /// Transport failures are absorbed into [`SubmitOutcome::Failed`]; the
    /// in-flight flag is cleared on every path so retry stays possible.
    pub async fn submit(&self, payload: &SubmissionPayload, bearer: &str) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("submission already in flight, ignoring");
            return SubmitOutcome::AlreadyInFlight;
        }

        let outcome = match self.transport.post(payload, bearer).await {
            Ok(body) if !body.trim().is_empty() => {
                info!("submission accepted by backend");
                SubmitOutcome::Accepted
            }
            Ok(_) => {
                warn!("backend returned an empty response body");
                SubmitOutcome::Rejected
            }
            Err(err) => {
                warn!(error = %err, "submission transport failed");
                SubmitOutcome::Failed
            }
        };

        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }
}

/// Submission state of a form instance.
///
/// `Idle → Submitting → {Success | Failure}`; `Failure` is retryable,
/// `Success` is terminal for the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    /// No submission attempted or the last one failed and was acknowledged.
    #[default]
    Idle,
    /// A submission is in flight.
    Submitting,
    /// The submission was accepted; the form has been cleared.
    Success,
    /// The last submission failed; the form state is preserved for retry.
    Failure,
}

/// Collaborators a form session reports through.
#[derive(Clone)]
pub struct Collaborators {
    /// Wall-clock source for the submission timestamp.
    pub clock: Arc<dyn Clock>,
    /// Last-known location source.
    pub location: Arc<dyn LocationProvider>,
    /// Transient notification sink.
    pub notifier: Arc<dyn Notifier>,
    /// Invoked with the success target after an accepted submission.
    pub navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// A single form instance: answer store, remarks, and submission lifecycle.
///
/// Each mount owns its own store; nothing is shared across instances except
/// the pipeline it submits through.
#[derive(Debug)]
pub struct FormSession {
    store: AnswerStore,
    remarks: String,
    fleet_number: String,
    state: SubmitState,
    pipeline: Arc<SubmitPipeline>,
    collaborators: Collaborators,
    success_target: String,
}

impl FormSession {
    /// Create a session for one vehicle over the given catalog.
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        fleet_number: impl Into<String>,
        pipeline: Arc<SubmitPipeline>,
        collaborators: Collaborators,
        success_target: impl Into<String>,
    ) -> Self {
        Self::with_store(
            AnswerStore::new(catalog),
            fleet_number,
            pipeline,
            collaborators,
            success_target,
        )
    }

    /// Create a session over an already-populated answer store.
    #[must_use]
    pub fn with_store(
        store: AnswerStore,
        fleet_number: impl Into<String>,
        pipeline: Arc<SubmitPipeline>,
        collaborators: Collaborators,
        success_target: impl Into<String>,
    ) -> Self {
        Self {
            store,
            remarks: String::new(),
            fleet_number: fleet_number.into(),
            state: SubmitState::default(),
            pipeline,
            collaborators,
            success_target: success_target.into(),
        }
    }

    /// The answer store.
    #[must_use]
    pub fn answers(&self) -> &AnswerStore {
        &self.store
    }

    /// Record an answer.
    ///
    /// # Errors
    ///
    /// Propagates answer-store errors (unknown key, inactive question,
    /// out-of-domain value).
    pub fn set_answer(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.store.set(key, value)
    }

    /// Clear an answer.
    pub fn clear_answer(&mut self, key: &str) {
        self.store.clear(key);
    }

    /// Replace the remarks text.
    pub fn set_remarks(&mut self, remarks: impl Into<String>) {
        self.remarks = remarks.into();
    }

    /// The current remarks text.
    #[must_use]
    pub fn remarks(&self) -> &str {
        &self.remarks
    }

    /// Current submission state.
    #[must_use]
    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Whether the submit affordance should be enabled.
    ///
    /// True iff the form is valid, nothing is in flight, and the instance
    /// has not already succeeded.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.state != SubmitState::Submitting
            && self.state != SubmitState::Success
            && !self.pipeline.is_in_flight()
            && is_valid(&self.store, &self.remarks)
    }

    /// Submit the form.
    ///
    /// Snapshots the answers, remarks, identity, location, and wall-clock
    /// time into a payload and sends it. On acceptance the store and
    /// remarks are cleared, a success notification is emitted, and the
    /// navigator is invoked with the success target. On rejection or
    /// transport failure the form state is preserved for retry and an error
    /// notification is emitted. A call while a submission is in flight is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationBlocked`] if called while the form is
    /// invalid or no location fix is available; both are programming
    /// invariants when the affordance is gated on [`Self::can_submit`].
    /// Submission failures never surface as errors.
    pub async fn submit(
        &mut self,
        identity: &StaffIdentity,
        credential: &str,
    ) -> Result<SubmitOutcome> {
        if self.state == SubmitState::Submitting || self.pipeline.is_in_flight() {
            debug!("submit ignored, already submitting");
            return Ok(SubmitOutcome::AlreadyInFlight);
        }

        let fix = self
            .collaborators
            .location
            .last_fix()
            .ok_or_else(|| Error::validation_blocked("no location fix available"))?;
        let context = SubmissionContext::from_identity(identity, self.fleet_number.as_str(), fix);
        let timestamp = self.collaborators.clock.now_local();
        let payload = SubmissionPayload::assemble(&self.store, &self.remarks, &context, timestamp)?;

        self.state = SubmitState::Submitting;
        let outcome = self.pipeline.submit(&payload, credential).await;

        match outcome {
            SubmitOutcome::Accepted => {
                self.store.reset();
                self.remarks.clear();
                self.state = SubmitState::Success;
                self.collaborators
                    .notifier
                    .notify(NoticeKind::Success, "Form successfully submitted");
                self.collaborators.navigator.navigate(&self.success_target);
            }
            SubmitOutcome::Rejected => {
                self.state = SubmitState::Failure;
                self.collaborators
                    .notifier
                    .notify(NoticeKind::Error, "Form submission failed");
            }
            SubmitOutcome::Failed => {
                self.state = SubmitState::Failure;
                self.collaborators.notifier.notify(
                    NoticeKind::Error,
                    "An error occurred. Please try again later",
                );
            }
            SubmitOutcome::AlreadyInFlight => {
                // Pipeline-level guard fired (shared pipeline); this session
                // never left its previous state observably.
                self.state = SubmitState::Idle;
            }
        }

        Ok(outcome)
    }
}
