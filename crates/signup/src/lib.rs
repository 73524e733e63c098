//! Sign-up domain for the finance web client.
//!
//! This crate contains the form schema, the validation engine, the transport
//! adapter contract, the typed API surface, and the submission state machine.
//! Infrastructure crates implement the port traits defined here; they never add
//! domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** No network I/O happens in this
//! crate. It defines *what* a transport, notifier, navigator, localizer, and
//! preview renderer must do; other crates define *how*.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`form`] | `FormInput`, `Field`, `CurrencyCode`, `Attachment` |
//! | [`validation`] | Rule table, cross-field refinement, per-field error view |
//! | [`transport`] | Descriptor shapes, canonical `TransportCall`, `Transport` port |
//! | [`api`] | Typed sign-up operation built on the transport port |
//! | [`pipeline`] | `SignUpForm` state machine, `SubmissionRequest`, `SubmissionOutcome` |
//! | [`controller`] | Async driver enforcing one in-flight submission |
//! | [`preview`] | Revocable avatar preview resource |
//! | [`i18n`] | Message keys, `Localizer` port, built-in catalog |
//! | [`ports`] | Notifier and navigator ports |
//! | [`identifiers`] | Newtype identifiers (`RoutePath`, `AttemptId`, `PreviewId`) |
//! | [`errors`] | Configuration, descriptor, and transport error types |

pub mod api;
pub mod controller;
pub mod errors;
pub mod form;
pub mod i18n;
pub mod identifiers;
pub mod pipeline;
pub mod ports;
pub mod preview;
pub mod transport;
pub mod validation;

// Re-export the working set at the crate root for downstream crates.
pub use api::{AuthenticationClient, SignUpBody, SignUpDto};
pub use controller::{SignUpController, SubmitReport};
pub use errors::{ConfigurationError, DescriptorError, TransportFailure};
pub use form::{Attachment, CurrencyCode, Field, FormInput};
pub use i18n::{Catalog, Locale, Localizer, MessageKey};
pub use identifiers::{AttemptId, PreviewId, RoutePath};
pub use pipeline::{
    Effect, FlowSettings, SignUpForm, SubmissionOutcome, SubmissionRequest, SubmissionState,
    SubmitAttempt,
};
pub use ports::{Navigator, Notification, NotificationLevel, Notifier};
pub use preview::{ObjectUrlRegistry, PreviewHandle, PreviewRenderer};
pub use transport::{
    CallDescriptor, FetchOptions, Method, MultipartForm, RequestBody, RequestConfig, Transport,
    TransportCall,
};
pub use validation::{FieldErrors, Rule, ValidationError};
