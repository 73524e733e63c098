//! `finance-signup` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: flags and environment via `clap`, layered over
//!    an optional TOML settings file. A missing base origin aborts here.
//! 2. **Wire observability**: `tracing-subscriber` with a text or JSON layer,
//!    plus an OpenTelemetry OTLP exporter when an endpoint is configured.
//! 3. **Construct infrastructure**: the reqwest-backed [`HttpTransport`], the
//!    message catalog, the preview registry, and the console ports.
//! 4. **Run one submission**: fill a [`SignUpForm`] from the arguments, submit
//!    it through the [`SignUpController`], and map the report to an exit code.

mod config;
mod console;
mod telemetry;

use std::io::Write;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use http_transport::HttpTransport;
use signup::{
    AuthenticationClient, Catalog, ObjectUrlRegistry, SignUpController, SignUpForm,
    SubmissionOutcome, SubmitReport,
};

use crate::config::{Args, FileSettings, Settings};
use crate::console::{load_attachment, ConsoleNavigator, ConsoleNotifier, Sink};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let _telemetry = telemetry::init(args.log_format, args.otlp_endpoint.as_deref())?;

    let file = match &args.config {
        Some(path) => FileSettings::load(path)?,
        None => FileSettings::default(),
    };
    let settings = Settings::resolve(&args, file).inspect_err(|error| {
        tracing::error!(error = %format!("{error:#}"), "startup aborted");
    })?;

    let transport = HttpTransport::new(settings.transport.clone())
        .context("cannot build the HTTP transport")?;
    let sink: Sink = Arc::new(Mutex::new(std::io::stdout()));

    let controller = SignUpController::new(
        SignUpForm::new(
            Arc::new(Catalog::new(settings.locale)),
            Arc::new(ObjectUrlRegistry::new()),
            settings.flow.clone(),
        ),
        AuthenticationClient::new(Arc::new(transport)),
        Arc::new(ConsoleNotifier::new(sink.clone())),
        Arc::new(ConsoleNavigator::new(sink)),
    );

    let avatar = args.avatar.as_deref().map(load_attachment).transpose()?;
    controller.with_form(|form| {
        form.set_email(args.email.clone());
        form.set_password(args.password.clone());
        form.set_confirm_password(args.confirm_password.clone());
        form.set_full_name(args.full_name.clone());
        form.set_currency(args.currency);
        form.select_avatar(avatar);
        if let Some(url) = form.preview_url() {
            tracing::debug!(%url, "avatar preview ready");
        }
    });

    let report = controller.submit().await;
    let code = exit_code(&report);
    if let SubmitReport::Rejected(_) = report {
        let mut out = std::io::stdout().lock();
        controller.with_form(|form| {
            for (field, message) in form.errors() {
                writeln!(out, "{}: {}", field, message.message)?;
            }
            Ok::<_, std::io::Error>(())
        })?;
    }
    if let SubmitReport::Completed(SubmissionOutcome::Conflict { field, message }) = &report {
        println!("{field}: {message}");
    }

    controller.teardown();
    Ok(ExitCode::from(code))
}

/// Exit status for a submit report.
///
/// `0` success, `1` transport failure or nothing sent, `2` invalid input,
/// `3` server-side conflict on a field.
fn exit_code(report: &SubmitReport) -> u8 {
    match report {
        SubmitReport::Completed(SubmissionOutcome::Success) => 0,
        SubmitReport::Rejected(_) => 2,
        SubmitReport::Completed(SubmissionOutcome::Conflict { .. }) => 3,
        SubmitReport::Completed(SubmissionOutcome::TransportFailure { .. })
        | SubmitReport::Ignored
        | SubmitReport::Discarded => 1,
    }
}
