//! Async driver for one sign-up form.
//!
//! The form lives behind a mutex that is only ever held for synchronous
//! transitions, never across the network await. A submit raised while another
//! is in flight therefore observes `Submitting` and returns immediately.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::Instrument;

use crate::api::AuthenticationClient;
use crate::identifiers::AttemptId;
use crate::pipeline::{Effect, SignUpForm, SubmissionOutcome, SubmitAttempt};
use crate::ports::{Navigator, Notifier};
use crate::validation::FieldErrors;

/// What a call to [`SignUpController::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReport {
    /// Nothing was sent: a submission was already in flight, had succeeded,
    /// or the form was torn down.
    Ignored,
    /// Nothing was sent: validation failed.
    Rejected(FieldErrors),
    /// One request was sent and its outcome applied.
    Completed(SubmissionOutcome),
    /// One request was sent but the form was torn down before it answered.
    Discarded,
}

/// Couples a [`SignUpForm`] with the API client and UI ports.
#[derive(Clone)]
pub struct SignUpController {
    form: Arc<Mutex<SignUpForm>>,
    client: AuthenticationClient,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl SignUpController {
    /// Wraps a mounted form.
    pub fn new(
        form: SignUpForm,
        client: AuthenticationClient,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            form: Arc::new(Mutex::new(form)),
            client,
            notifier,
            navigator,
        }
    }

    /// Runs `f` against the form.
    ///
    /// Edits, blurs, and reads go through here. The lock is released when
    /// `f` returns.
    pub fn with_form<R>(&self, f: impl FnOnce(&mut SignUpForm) -> R) -> R {
        let mut form = self.form.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut form)
    }

    /// Handles one user-initiated submit.
    ///
    /// At most one request is in flight per form. On success this returns
    /// after the redirect has been performed (or skipped because the form was
    /// torn down in the meantime). Dropping the returned future before the
    /// response is applied leaves the form idle again.
    pub async fn submit(&self) -> SubmitReport {
        let (attempt, request) = match self.with_form(SignUpForm::begin_submit) {
            SubmitAttempt::Ignored => return SubmitReport::Ignored,
            SubmitAttempt::Rejected(errors) => return SubmitReport::Rejected(errors),
            SubmitAttempt::Dispatch { attempt, request } => (attempt, request),
        };

        let span = tracing::info_span!("sign_up.submit", %attempt);
        let mut in_flight = InFlight {
            form: &self.form,
            attempt: Some(attempt),
        };
        async move {
            tracing::info!(
                has_avatar = request.body().avatar.is_some(),
                currency = %request.body().dto.currency_code,
                "dispatching sign-up"
            );
            let result = self.client.sign_up(request.body()).await;

            let (outcome, effect, active) = self.with_form(|form| {
                let outcome = form.classify(result);
                let effect = form.complete(attempt, outcome.clone());
                (outcome, effect, form.is_active())
            });
            in_flight.disarm();
            if !active {
                tracing::debug!("response arrived after teardown; discarded");
                return SubmitReport::Discarded;
            }

            if let Some(effect) = effect {
                self.perform(effect).await;
            }
            SubmitReport::Completed(outcome)
        }
        .instrument(span)
        .await
    }

    async fn perform(&self, effect: Effect) {
        match effect {
            Effect::Notify(notification) => self.notifier.notify(&notification),
            Effect::NotifyAndRedirect {
                notification,
                to,
                after,
            } => {
                self.notifier.notify(&notification);
                tokio::time::sleep(after).await;
                if self.with_form(|form| form.is_active()) {
                    tracing::info!(route = %to, "redirecting after sign-up");
                    self.navigator.navigate(&to);
                } else {
                    tracing::debug!(route = %to, "redirect skipped; form torn down");
                }
            }
        }
    }

    /// Unmounts the form.
    pub fn teardown(&self) {
        self.with_form(SignUpForm::teardown);
    }
}

/// Frees the form's in-flight slot if a submit future is dropped between
/// dispatch and completion.
struct InFlight<'a> {
    form: &'a Mutex<SignUpForm>,
    attempt: Option<AttemptId>,
}

impl InFlight<'_> {
    fn disarm(&mut self) {
        self.attempt = None;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(attempt) = self.attempt.take() {
            tracing::debug!(%attempt, "submit dropped before completion");
            self.form
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .abandon(attempt);
        }
    }
}

impl std::fmt::Debug for SignUpController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpController")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
