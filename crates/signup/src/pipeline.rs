//! Submission state machine for the sign-up form.
//!
//! [`SignUpForm`] is synchronous: edits, blurs, and the two halves of a
//! submission ([`SignUpForm::begin_submit`] and [`SignUpForm::complete`]) are
//! plain method calls. The only suspension point, the network call, sits
//! between those two halves and is driven by
//! [`SignUpController`](crate::controller::SignUpController).
//!
//! ```text
//! Idle --submit(valid)--> Submitting --Success--> Succeeded
//!  ^  \--submit(invalid)--/    |
//!  |                           +--Conflict / TransportFailure--> Idle
//! ```
//!
//! Validation is not a resting state: it runs to completion inside `blur`
//! and `begin_submit`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::api::{SignUpBody, SignUpDto};
use crate::errors::TransportFailure;
use crate::form::{Attachment, CurrencyCode, Field, FormInput};
use crate::i18n::{Localizer, MessageKey};
use crate::identifiers::{AttemptId, RoutePath};
use crate::ports::Notification;
use crate::preview::{PreviewHandle, PreviewRenderer};
use crate::validation::{FieldErrors, Rule, SIGN_UP_SCHEMA};

/// Delay between the success notification and the redirect to sign-in.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// Request and outcome
// ---------------------------------------------------------------------------

/// Transport-ready projection of a valid [`FormInput`].
///
/// The only constructor is [`TryFrom<&FormInput>`], which validates first, so
/// a request can never be derived from an invalid input.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest(SignUpBody);

impl SubmissionRequest {
    /// The multipart body to send.
    pub fn body(&self) -> &SignUpBody {
        &self.0
    }
}

impl TryFrom<&FormInput> for SubmissionRequest {
    type Error = FieldErrors;

    fn try_from(input: &FormInput) -> Result<Self, Self::Error> {
        let errors = FieldErrors::check(input);
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self(SignUpBody {
            dto: SignUpDto {
                email: input.email.clone(),
                password: input.password.clone(),
                full_name: input.full_name.clone(),
                currency_code: input.currency_code,
            },
            avatar: input.avatar.clone(),
        }))
    }
}

/// Result of one dispatched submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The account was created.
    Success,
    /// The server rejected a value that the user can fix in `field`.
    Conflict {
        /// Field the message is shown under.
        field: Field,
        /// Localized message.
        message: String,
    },
    /// Any other failure; not correctable through the form.
    TransportFailure {
        /// Diagnostic description, for logs only.
        message: String,
    },
}

impl SubmissionOutcome {
    /// Maps a transport result onto an outcome.
    ///
    /// A 409 status is the only server condition mapped to a field: it means
    /// the e-mail address is already registered.
    pub fn classify(result: Result<Value, TransportFailure>, localizer: &dyn Localizer) -> Self {
        match result {
            Ok(_) => SubmissionOutcome::Success,
            Err(failure) if failure.is_conflict() => SubmissionOutcome::Conflict {
                field: Field::Email,
                message: localizer.message(MessageKey::EmailExists),
            },
            Err(failure) => SubmissionOutcome::TransportFailure {
                message: failure.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Field messages
// ---------------------------------------------------------------------------

/// Where a displayed field error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    /// A schema rule failed locally.
    Rule(Rule),
    /// The server reported a conflict.
    Conflict,
}

/// An error displayed under one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMessage {
    /// Origin of the error.
    pub source: ErrorSource,
    /// Localized text.
    pub message: String,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Submission state of a form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Editable; no request in flight.
    Idle,
    /// One request is in flight.
    Submitting {
        /// The attempt awaiting completion.
        attempt: AttemptId,
    },
    /// The account was created; the form is done.
    Succeeded,
}

/// Flow-level settings fixed when the form mounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSettings {
    /// Destination after a successful sign-up.
    pub sign_in_route: RoutePath,
    /// Pause between the success notification and navigation.
    pub redirect_delay: Duration,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            sign_in_route: RoutePath::sign_in(),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }
}

/// Decision taken by [`SignUpForm::begin_submit`].
#[derive(Debug)]
pub enum SubmitAttempt {
    /// Input is valid; send `request` and report back with `attempt`.
    Dispatch {
        /// Ticket to pass to [`SignUpForm::complete`].
        attempt: AttemptId,
        /// What to send.
        request: SubmissionRequest,
    },
    /// Validation failed; errors are now displayed.
    Rejected(FieldErrors),
    /// A submission is already in flight, has succeeded, or the form is gone.
    Ignored,
}

/// UI effect to perform after a completed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a notification.
    Notify(Notification),
    /// Show a notification, then navigate after a pause.
    NotifyAndRedirect {
        /// The notification to show first.
        notification: Notification,
        /// Navigation target.
        to: RoutePath,
        /// Pause before navigating.
        after: Duration,
    },
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// One mounted sign-up form.
pub struct SignUpForm {
    input: FormInput,
    errors: BTreeMap<Field, FieldMessage>,
    state: SubmissionState,
    last_attempt: AttemptId,
    submitted_once: bool,
    active: bool,
    show_password: bool,
    show_confirm_password: bool,
    preview: Option<PreviewHandle>,
    renderer: Arc<dyn PreviewRenderer>,
    localizer: Arc<dyn Localizer>,
    settings: FlowSettings,
}

impl SignUpForm {
    /// Mounts a form with default values.
    pub fn new(
        localizer: Arc<dyn Localizer>,
        renderer: Arc<dyn PreviewRenderer>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            input: FormInput::default(),
            errors: BTreeMap::new(),
            state: SubmissionState::Idle,
            last_attempt: AttemptId::default(),
            submitted_once: false,
            active: true,
            show_password: false,
            show_confirm_password: false,
            preview: None,
            renderer,
            localizer,
            settings,
        }
    }

    // -- observation -------------------------------------------------------

    /// Current values.
    pub fn input(&self) -> &FormInput {
        &self.input
    }

    /// Current submission state.
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// `true` while a request is in flight; the submit control is disabled.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, SubmissionState::Submitting { .. })
    }

    /// `false` once the form has been torn down.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The error displayed under `field`.
    pub fn error(&self, field: Field) -> Option<&FieldMessage> {
        self.errors.get(&field)
    }

    /// Text of the error displayed under `field`.
    pub fn error_message(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(|e| e.message.as_str())
    }

    /// Every displayed error, in field order.
    pub fn errors(&self) -> impl Iterator<Item = (Field, &FieldMessage)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, message))
    }

    /// Whether the password is shown in clear text.
    pub fn password_visible(&self) -> bool {
        self.show_password
    }

    /// Whether the confirmation is shown in clear text.
    pub fn confirm_password_visible(&self) -> bool {
        self.show_confirm_password
    }

    /// Reference to the avatar preview, if one is selected.
    pub fn preview_url(&self) -> Option<String> {
        self.preview.as_ref().and_then(PreviewHandle::url)
    }

    /// Label of the submit control.
    pub fn submit_label(&self) -> String {
        let key = if self.is_pending() {
            MessageKey::Loading
        } else {
            MessageKey::SignUp
        };
        self.localizer.message(key)
    }

    /// Maps a transport result with this form's localizer.
    pub fn classify(&self, result: Result<Value, TransportFailure>) -> SubmissionOutcome {
        SubmissionOutcome::classify(result, self.localizer.as_ref())
    }

    // -- edits -------------------------------------------------------------

    /// Sets the e-mail address.
    pub fn set_email(&mut self, value: impl Into<String>) {
        if !self.active {
            return;
        }
        self.input.email = value.into();
        self.after_edit(Field::Email);
    }

    /// Sets the password.
    pub fn set_password(&mut self, value: impl Into<String>) {
        if !self.active {
            return;
        }
        self.input.password = value.into();
        self.after_edit(Field::Password);
    }

    /// Sets the password confirmation.
    pub fn set_confirm_password(&mut self, value: impl Into<String>) {
        if !self.active {
            return;
        }
        self.input.confirm_password = value.into();
        self.after_edit(Field::ConfirmPassword);
    }

    /// Sets the display name.
    pub fn set_full_name(&mut self, value: impl Into<String>) {
        if !self.active {
            return;
        }
        self.input.full_name = value.into();
        self.after_edit(Field::FullName);
    }

    /// Sets the account currency.
    pub fn set_currency(&mut self, value: CurrencyCode) {
        if !self.active {
            return;
        }
        self.input.currency_code = value;
        self.after_edit(Field::CurrencyCode);
    }

    /// Selects or clears the avatar.
    ///
    /// The previous preview is released before a new one is acquired. File
    /// pickers have no blur, so the avatar is validated right away. Ignored
    /// once the form is torn down, like every other edit.
    pub fn select_avatar(&mut self, attachment: Option<Attachment>) {
        if !self.active {
            return;
        }
        self.preview = None;
        if let Some(file) = &attachment {
            self.preview = Some(PreviewHandle::acquire(self.renderer.clone(), file));
        }
        self.input.avatar = attachment;
        self.refresh(Field::Avatar);
    }

    /// Flips password visibility.
    pub fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    /// Flips confirmation visibility.
    pub fn toggle_confirm_password_visibility(&mut self) {
        self.show_confirm_password = !self.show_confirm_password;
    }

    /// Validates on focus loss. Never dispatches.
    pub fn blur(&mut self, field: Field) {
        if self.active {
            self.refresh(field);
        }
    }

    // After the first submit, edits revalidate the edited field immediately.
    fn after_edit(&mut self, field: Field) {
        if self.submitted_once {
            self.refresh(field);
        }
    }

    /// Re-checks `field` against current values, plus any displayed error
    /// that depends on it through a cross-field rule.
    fn refresh(&mut self, field: Field) {
        let current = FieldErrors::check(&self.input);
        self.apply(field, current.get(field));

        let dependents: Vec<Field> = SIGN_UP_SCHEMA
            .iter()
            .filter(|entry| entry.target != field && entry.reads.contains(&field))
            .map(|entry| entry.target)
            .filter(|target| self.errors.contains_key(target))
            .collect();
        for target in dependents {
            self.apply(target, current.get(target));
        }
    }

    fn apply(&mut self, field: Field, rule: Option<Rule>) {
        match rule {
            Some(rule) => {
                let message = self.localizer.message(rule.message_key());
                self.errors.insert(
                    field,
                    FieldMessage {
                        source: ErrorSource::Rule(rule),
                        message,
                    },
                );
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    // -- submission --------------------------------------------------------

    /// First half of a submission: validate and claim the in-flight slot.
    pub fn begin_submit(&mut self) -> SubmitAttempt {
        if !self.active || self.state != SubmissionState::Idle {
            tracing::debug!(state = ?self.state, active = self.active, "submit ignored");
            return SubmitAttempt::Ignored;
        }
        self.submitted_once = true;

        match SubmissionRequest::try_from(&self.input) {
            Err(errors) => {
                self.errors.clear();
                for (field, rule) in errors.iter() {
                    self.apply(field, Some(rule));
                }
                tracing::info!(invalid_fields = errors.len(), "submit rejected by validation");
                SubmitAttempt::Rejected(errors)
            }
            Ok(request) => {
                self.errors.clear();
                let attempt = self.last_attempt.next();
                self.last_attempt = attempt;
                self.state = SubmissionState::Submitting { attempt };
                SubmitAttempt::Dispatch { attempt, request }
            }
        }
    }

    /// Second half of a submission: apply its outcome.
    ///
    /// Returns the effect the caller must perform, if any. A conflict yields
    /// no effect because its signal is the field error itself. Completions for
    /// a torn-down form or for an attempt that is not in flight are ignored.
    pub fn complete(&mut self, attempt: AttemptId, outcome: SubmissionOutcome) -> Option<Effect> {
        if !self.active {
            tracing::debug!(%attempt, "completion after teardown ignored");
            return None;
        }
        if self.state != (SubmissionState::Submitting { attempt }) {
            tracing::warn!(%attempt, state = ?self.state, "stale completion ignored");
            return None;
        }

        match outcome {
            SubmissionOutcome::Success => {
                self.state = SubmissionState::Succeeded;
                // The input is not reused after success; drop the secrets now.
                self.input = FormInput::default();
                Some(Effect::NotifyAndRedirect {
                    notification: Notification::success(
                        self.localizer.message(MessageKey::SignUpSuccess),
                    ),
                    to: self.settings.sign_in_route.clone(),
                    after: self.settings.redirect_delay,
                })
            }
            SubmissionOutcome::Conflict { field, message } => {
                self.state = SubmissionState::Idle;
                self.errors.insert(
                    field,
                    FieldMessage {
                        source: ErrorSource::Conflict,
                        message,
                    },
                );
                None
            }
            SubmissionOutcome::TransportFailure { message } => {
                self.state = SubmissionState::Idle;
                tracing::warn!(%attempt, error = %message, "sign-up failed");
                Some(Effect::Notify(Notification::error(
                    self.localizer.message(MessageKey::GenericError),
                )))
            }
        }
    }

    /// Frees the in-flight slot of an attempt whose response will never be
    /// applied. Any other state is left untouched.
    pub fn abandon(&mut self, attempt: AttemptId) {
        if self.state == (SubmissionState::Submitting { attempt }) {
            self.state = SubmissionState::Idle;
            tracing::debug!(%attempt, "in-flight submission abandoned");
        }
    }

    /// Unmounts the form: releases the preview and ignores late responses.
    pub fn teardown(&mut self) {
        self.active = false;
        self.preview = None;
        tracing::debug!(state = ?self.state, "form torn down");
    }
}

impl std::fmt::Debug for SignUpForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpForm")
            .field("input", &self.input)
            .field("errors", &self.errors)
            .field("state", &self.state)
            .field("active", &self.active)
            .field("preview", &self.preview)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::i18n::{Catalog, Locale};
    use crate::preview::ObjectUrlRegistry;

    fn catalog() -> Catalog {
        Catalog::new(Locale::En)
    }

    fn form_with(registry: Arc<ObjectUrlRegistry>) -> SignUpForm {
        SignUpForm::new(Arc::new(catalog()), registry, FlowSettings::default())
    }

    fn form() -> SignUpForm {
        form_with(Arc::new(ObjectUrlRegistry::new()))
    }

    fn filled() -> SignUpForm {
        let mut form = form();
        form.set_email("a@b.com");
        form.set_password("Abcdef1!");
        form.set_confirm_password("Abcdef1!");
        form.set_full_name("A B");
        form.set_currency(CurrencyCode::Usd);
        form
    }

    fn dispatch(form: &mut SignUpForm) -> (AttemptId, SubmissionRequest) {
        match form.begin_submit() {
            SubmitAttempt::Dispatch { attempt, request } => (attempt, request),
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    #[test]
    fn valid_submit_claims_the_in_flight_slot() {
        let mut form = filled();
        let (attempt, request) = dispatch(&mut form);

        assert_eq!(form.state(), SubmissionState::Submitting { attempt });
        assert!(form.is_pending());
        assert_eq!(form.submit_label(), catalog().message(MessageKey::Loading));
        assert_eq!(request.body().dto.email, "a@b.com");
        assert_eq!(request.body().dto.currency_code, CurrencyCode::Usd);
        assert!(request.body().avatar.is_none());
    }

    #[test]
    fn second_submit_while_submitting_is_ignored() {
        let mut form = filled();
        let _ = dispatch(&mut form);
        assert!(matches!(form.begin_submit(), SubmitAttempt::Ignored));
    }

    #[test]
    fn invalid_submit_displays_errors_and_stays_idle() {
        let mut form = form();
        form.set_email("nope");

        let SubmitAttempt::Rejected(errors) = form.begin_submit() else {
            panic!("expected rejection");
        };
        assert_eq!(form.state(), SubmissionState::Idle);
        assert_eq!(errors.get(Field::Email), Some(Rule::InvalidEmail));
        assert_eq!(
            form.error_message(Field::Email),
            Some(catalog().message(MessageKey::InvalidEmail).as_str())
        );
        assert!(form.error(Field::FullName).is_some());
    }

    #[test]
    fn blur_reports_only_the_blurred_field() {
        let mut form = form();
        form.set_password("Abcdef1!");
        form.set_confirm_password("different1A");

        form.blur(Field::Password);
        assert!(form.error(Field::Password).is_none());
        assert!(form.error(Field::ConfirmPassword).is_none());

        form.blur(Field::ConfirmPassword);
        assert_eq!(
            form.error(Field::ConfirmPassword).map(|e| e.source),
            Some(ErrorSource::Rule(Rule::Mismatch))
        );
        assert!(form.error(Field::Password).is_none());
        assert!(form.error(Field::Email).is_none());
    }

    #[test]
    fn fixing_the_password_clears_a_displayed_mismatch() {
        let mut form = form();
        form.set_password("Abcdef1!");
        form.set_confirm_password("Abcdef1?");
        form.blur(Field::ConfirmPassword);
        assert!(form.error(Field::ConfirmPassword).is_some());

        form.set_password("Abcdef1?");
        form.blur(Field::Password);
        assert!(form.error(Field::ConfirmPassword).is_none());
    }

    #[test]
    fn blur_uses_latest_values() {
        let mut form = form();
        form.set_email("bad");
        form.blur(Field::Email);
        assert!(form.error(Field::Email).is_some());

        form.set_email("good@example.com");
        form.blur(Field::Email);
        assert!(form.error(Field::Email).is_none());
    }

    #[test]
    fn edits_revalidate_after_the_first_submit() {
        let mut form = form();
        let _ = form.begin_submit();
        assert!(form.error(Field::FullName).is_some());

        form.set_full_name("Jane");
        assert!(form.error(Field::FullName).is_none());
    }

    #[test]
    fn success_moves_to_succeeded_and_requests_redirect() {
        let mut form = filled();
        let (attempt, _) = dispatch(&mut form);

        let effect = form.complete(attempt, SubmissionOutcome::Success);
        assert_eq!(
            effect,
            Some(Effect::NotifyAndRedirect {
                notification: Notification::success(catalog().message(MessageKey::SignUpSuccess)),
                to: RoutePath::sign_in(),
                after: DEFAULT_REDIRECT_DELAY,
            })
        );
        assert_eq!(form.state(), SubmissionState::Succeeded);
        assert!(form.input().password.is_empty());
        assert!(matches!(form.begin_submit(), SubmitAttempt::Ignored));
    }

    #[test]
    fn conflict_attaches_to_email_and_returns_to_idle() {
        let mut form = filled();
        let (attempt, _) = dispatch(&mut form);
        let outcome = form.classify(Err(TransportFailure::Status {
            status: 409,
            body: "{\"message\":\"exists\"}".to_owned(),
        }));

        let effect = form.complete(attempt, outcome);
        assert_eq!(effect, None);
        assert_eq!(form.state(), SubmissionState::Idle);
        assert_eq!(
            form.error(Field::Email),
            Some(&FieldMessage {
                source: ErrorSource::Conflict,
                message: catalog().message(MessageKey::EmailExists),
            })
        );
    }

    #[rstest]
    #[case::server_error(TransportFailure::Status { status: 500, body: String::new() })]
    #[case::bad_request(TransportFailure::Status { status: 400, body: "bad".to_owned() })]
    #[case::network(TransportFailure::Network { message: "refused".to_owned() })]
    fn other_failures_notify_without_field_errors(#[case] failure: TransportFailure) {
        let mut form = filled();
        let (attempt, _) = dispatch(&mut form);
        let outcome = form.classify(Err(failure));

        let effect = form.complete(attempt, outcome);
        assert_eq!(
            effect,
            Some(Effect::Notify(Notification::error(
                catalog().message(MessageKey::GenericError)
            )))
        );
        assert_eq!(form.state(), SubmissionState::Idle);
        assert_eq!(form.errors().count(), 0);
    }

    #[test]
    fn resubmitting_after_failure_uses_a_new_attempt() {
        let mut form = filled();
        let (first, _) = dispatch(&mut form);
        let _ = form.complete(
            first,
            SubmissionOutcome::TransportFailure {
                message: "boom".to_owned(),
            },
        );

        let (second, _) = dispatch(&mut form);
        assert!(second > first);
        assert_eq!(form.complete(first, SubmissionOutcome::Success), None);
        assert!(form.is_pending());
    }

    #[test]
    fn abandoning_the_in_flight_attempt_frees_the_slot() {
        let mut form = filled();
        let (attempt, _) = dispatch(&mut form);

        form.abandon(attempt);
        assert_eq!(form.state(), SubmissionState::Idle);
        assert_eq!(form.complete(attempt, SubmissionOutcome::Success), None);

        let (next, _) = dispatch(&mut form);
        assert!(next > attempt);
    }

    #[test]
    fn abandoning_a_stale_attempt_changes_nothing() {
        let mut form = filled();
        let (first, _) = dispatch(&mut form);
        let _ = form.complete(
            first,
            SubmissionOutcome::TransportFailure {
                message: "boom".to_owned(),
            },
        );
        let (second, _) = dispatch(&mut form);

        form.abandon(first);
        assert_eq!(form.state(), SubmissionState::Submitting { attempt: second });

        let _ = form.complete(second, SubmissionOutcome::Success);
        form.abandon(second);
        assert_eq!(form.state(), SubmissionState::Succeeded);
    }

    #[test]
    fn completion_after_teardown_is_ignored() {
        let mut form = filled();
        let (attempt, _) = dispatch(&mut form);
        form.teardown();

        assert_eq!(form.complete(attempt, SubmissionOutcome::Success), None);
        assert!(!form.is_active());
        assert!(matches!(form.begin_submit(), SubmitAttempt::Ignored));
    }

    #[test]
    fn avatar_selection_manages_the_preview_lifecycle() {
        let registry = Arc::new(ObjectUrlRegistry::new());
        let mut form = form_with(registry.clone());

        form.select_avatar(Some(Attachment::new("a.png", "image/png", vec![0; 10])));
        let first = form.preview_url();
        assert!(first.is_some());
        assert_eq!(registry.live_count(), 1);

        form.select_avatar(Some(Attachment::new("b.png", "image/png", vec![0; 10])));
        assert_eq!(registry.live_count(), 1);
        assert_ne!(form.preview_url(), first);

        form.select_avatar(None);
        assert_eq!(registry.live_count(), 0);
        assert_eq!(form.preview_url(), None);

        form.select_avatar(Some(Attachment::new("c.png", "image/png", vec![0; 10])));
        form.teardown();
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn selection_after_teardown_acquires_no_preview() {
        let registry = Arc::new(ObjectUrlRegistry::new());
        let mut form = form_with(registry.clone());
        form.teardown();

        form.select_avatar(Some(Attachment::new("late.png", "image/png", vec![0; 10])));

        assert_eq!(registry.live_count(), 0);
        assert_eq!(form.preview_url(), None);
        assert!(form.input().avatar.is_none());
    }

    #[test]
    fn edits_after_teardown_are_ignored() {
        let mut form = filled();
        form.teardown();

        form.set_email("late@example.com");
        form.set_password("Late1234");
        form.set_confirm_password("Late1234");
        form.set_full_name("Late");
        form.set_currency(CurrencyCode::Eur);

        assert_eq!(form.input().email, "a@b.com");
        assert_eq!(form.input().password, "Abcdef1!");
        assert_eq!(form.input().full_name, "A B");
        assert_eq!(form.input().currency_code, CurrencyCode::Usd);
    }

    #[test]
    fn dropping_the_form_releases_the_preview() {
        let registry = Arc::new(ObjectUrlRegistry::new());
        let mut form = form_with(registry.clone());
        form.select_avatar(Some(Attachment::new("a.png", "image/png", vec![0; 10])));
        drop(form);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn oversized_avatar_is_flagged_on_selection() {
        let mut form = form();
        form.select_avatar(Some(Attachment::new(
            "big.png",
            "image/png",
            vec![0; 3 * 1024 * 1024],
        )));
        assert_eq!(
            form.error(Field::Avatar).map(|e| e.source),
            Some(ErrorSource::Rule(Rule::FileSize))
        );
        assert!(form.preview_url().is_some(), "invalid files still preview");
    }

    #[test]
    fn visibility_toggles_are_independent() {
        let mut form = form();
        form.toggle_password_visibility();
        assert!(form.password_visible());
        assert!(!form.confirm_password_visible());

        form.toggle_confirm_password_visibility();
        form.toggle_password_visibility();
        assert!(!form.password_visible());
        assert!(form.confirm_password_visible());
        assert!(form.errors().next().is_none());
    }

    #[test]
    fn request_cannot_be_derived_from_invalid_input() {
        let errors = SubmissionRequest::try_from(&FormInput::default()).expect_err("invalid");
        assert!(errors.get(Field::Email).is_some());
        assert!(errors.get(Field::Avatar).is_none());
    }
}
