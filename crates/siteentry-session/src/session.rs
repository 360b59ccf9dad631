//! Per-form session state machine.
//!
//! ```text
//! Idle ─┬─ update_field ──▶ Editing ── request_submit ──▶ Validating
//!       │                                                  │      │
//!       └──────────── request_submit ──────────────────────┘      │
//!                                         invalid ◀───────────────┤
//!                                            ▼                    ▼
//!   Editing ◀── Failed ◀── error ──────── Submitting ◀───────── valid
//!   Idle    ◀── Succeeded ◀── success ────────┘
//! ```
//!
//! `Succeeded` and `Failed` are pass-through states: the session settles in
//! `Idle` (values reset) or `Editing` (values kept) before control returns.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use siteentry_core::{
    FieldValue, FormDefinition, FormKind, FormValues, GeoCapture, ValidationResult, definition,
    validate,
};
use siteentry_gateway::{Gateway, SubmissionOutcome};
use tracing::{debug, info, warn};

use crate::{Notice, SequenceError, SessionError};

pub const FIX_FIELDS_MESSAGE: &str = "Please fix the highlighted fields.";

static NEXT_SUBMISSION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Editing,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Idle => "idle",
            Status::Editing => "editing",
            Status::Validating => "validating",
            Status::Submitting => "submitting",
            Status::Succeeded => "succeeded",
            Status::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRecord {
    pub from: Status,
    pub to: Status,
    pub at: DateTime<Utc>,
}

/// A submission that passed validation and is waiting to be sent.
///
/// Carries its own copy of the values, so the payload the gateway sees is
/// exactly what was validated.
#[derive(Debug)]
pub struct Submission {
    id: u64,
    kind: FormKind,
    values: FormValues,
}

impl Submission {
    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub async fn send(&self, gateway: &Gateway) -> SubmissionOutcome {
        gateway.submit(self.kind, &self.values).await
    }
}

#[derive(Debug)]
pub enum SubmitStart {
    /// Send the submission, then hand the outcome to [`FormSession::complete`].
    Ready(Submission),
    /// Validation failed; the session is already back in `Editing`.
    Blocked(SubmissionOutcome),
}

/// One open form: its values, status, last errors, and pending notices.
pub struct FormSession {
    kind: FormKind,
    definition: &'static FormDefinition,
    values: FormValues,
    status: Status,
    errors: ValidationResult,
    last_outcome: Option<SubmissionOutcome>,
    in_flight: Option<u64>,
    pub(crate) check_in: Option<GeoCapture>,
    pub(crate) check_out: Option<GeoCapture>,
    notices: Vec<Notice>,
    transitions: Vec<TransitionRecord>,
}

impl FormSession {
    pub fn new(kind: FormKind) -> Self {
        let definition = definition(kind);
        Self {
            kind,
            definition,
            values: FormValues::from_defaults(definition),
            status: Status::Idle,
            errors: ValidationResult::default(),
            last_outcome: None,
            in_flight: None,
            check_in: None,
            check_out: None,
            notices: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn definition(&self) -> &'static FormDefinition {
        self.definition
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Errors from the most recent submit attempt, for inline display.
    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    /// Validate the current values without touching session state.
    pub fn validation(&self) -> ValidationResult {
        validate(self.definition, &self.values)
    }

    pub fn last_outcome(&self) -> Option<&SubmissionOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn checked_in(&self) -> Option<&GeoCapture> {
        self.check_in.as_ref()
    }

    pub fn checked_out(&self) -> Option<&GeoCapture> {
        self.check_out.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    /// Set one field. Does not validate.
    pub fn update_field(&mut self, name: &str, value: FieldValue) -> Result<(), SessionError> {
        self.require_editable("update a field")?;
        let definition = self.definition;
        let spec = definition.require_field(name)?;
        debug!(form = %self.kind, field = spec.name, "field updated");
        self.values.set(spec.name, value);
        self.enter_editing();
        Ok(())
    }

    /// Validate and, if the values pass, move to `Submitting`.
    ///
    /// A `Ready` submission must be handed back through [`complete`] or
    /// [`abandon`]; until then the session stays in `Submitting`.
    ///
    /// [`complete`]: FormSession::complete
    /// [`abandon`]: FormSession::abandon
    pub fn begin_submit(&mut self) -> Result<SubmitStart, SequenceError> {
        match self.status {
            Status::Idle | Status::Editing => {}
            Status::Submitting => {
                warn!(form = %self.kind, "submit requested while another is in flight");
                return Err(SequenceError::SubmitInFlight);
            }
            status => {
                return Err(SequenceError::InvalidState {
                    action: "submit",
                    status,
                });
            }
        }

        self.transition(Status::Validating);
        self.errors = validate(self.definition, &self.values);
        if !self.errors.is_submittable() {
            info!(
                form = %self.kind,
                invalid_fields = self.errors.len(),
                "submission blocked by validation"
            );
            let outcome = SubmissionOutcome::error(FIX_FIELDS_MESSAGE);
            self.fail(outcome.clone());
            return Ok(SubmitStart::Blocked(outcome));
        }

        self.transition(Status::Submitting);
        let id = NEXT_SUBMISSION.fetch_add(1, Ordering::Relaxed);
        self.in_flight = Some(id);
        Ok(SubmitStart::Ready(Submission {
            id,
            kind: self.kind,
            values: self.values.clone(),
        }))
    }

    /// Apply the gateway's outcome for the in-flight submission.
    pub fn complete(
        &mut self,
        submission: Submission,
        outcome: SubmissionOutcome,
    ) -> Result<(), SequenceError> {
        if self.in_flight != Some(submission.id) {
            return Err(SequenceError::NoSubmissionInFlight);
        }
        self.in_flight = None;
        if outcome.is_success() {
            self.succeed(outcome);
        } else {
            self.fail(outcome);
        }
        Ok(())
    }

    /// Give up on a submission that was never sent, or whose outcome will
    /// never arrive. Values are kept and the session returns to `Editing`.
    pub fn abandon(&mut self, submission: Submission) -> Result<(), SequenceError> {
        if self.in_flight != Some(submission.id) {
            return Err(SequenceError::NoSubmissionInFlight);
        }
        self.in_flight = None;
        info!(form = %self.kind, "submission abandoned");
        self.transition(Status::Editing);
        Ok(())
    }

    /// Validate, submit through `gateway` once, and apply the outcome.
    ///
    /// Validation failures come back as an error outcome, not an `Err`;
    /// `Err` means the request was refused and nothing changed.
    pub async fn request_submit(
        &mut self,
        gateway: &Gateway,
    ) -> Result<SubmissionOutcome, SequenceError> {
        let submission = match self.begin_submit()? {
            SubmitStart::Ready(submission) => submission,
            SubmitStart::Blocked(outcome) => return Ok(outcome),
        };
        let outcome = submission.send(gateway).await;
        self.complete(submission, outcome.clone())?;
        Ok(outcome)
    }

    // ── Internal transitions ──

    pub(crate) fn require_editable(&self, action: &'static str) -> Result<(), SequenceError> {
        match self.status {
            Status::Idle | Status::Editing | Status::Failed => Ok(()),
            status => Err(SequenceError::InvalidState { action, status }),
        }
    }

    /// Write a derived value captured by the session itself.
    pub(crate) fn set_derived(&mut self, name: &'static str, value: String) {
        self.values.set(name, FieldValue::Text(value));
        self.enter_editing();
    }

    pub(crate) fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn enter_editing(&mut self) {
        if self.status != Status::Editing {
            self.transition(Status::Editing);
        }
    }

    fn succeed(&mut self, outcome: SubmissionOutcome) {
        self.transition(Status::Succeeded);
        info!(form = %self.kind, "submission succeeded, resetting form");
        self.push_notice(Notice::success(&outcome.message));
        self.values = FormValues::from_defaults(self.definition);
        self.errors = ValidationResult::default();
        self.check_in = None;
        self.check_out = None;
        self.last_outcome = Some(outcome);
        self.transition(Status::Idle);
    }

    fn fail(&mut self, outcome: SubmissionOutcome) {
        self.transition(Status::Failed);
        warn!(form = %self.kind, message = %outcome.message, "submission failed");
        self.push_notice(Notice::error(&outcome.message));
        self.last_outcome = Some(outcome);
        self.transition(Status::Editing);
    }

    fn transition(&mut self, to: Status) {
        let from = self.status;
        debug!(form = %self.kind, %from, %to, "session transition");
        self.transitions.push(TransitionRecord {
            from,
            to,
            at: Utc::now(),
        });
        self.status = to;
    }
}
