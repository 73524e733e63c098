//! Error types shared across the sign-up domain.
//!
//! [`ConfigurationError`] covers startup faults: a transport that cannot be
//! configured never produces a usable pipeline. [`TransportFailure`] covers
//! one failed call and is never retried. Validation failures are not errors in
//! this sense; they live in [`crate::validation`] and never leave the form.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// Errors raised while building the transport configuration.
///
/// Produced at load time; the submission pipeline never starts with an invalid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No base origin was supplied.
    #[error("Configuration error: base origin is missing")]
    MissingBaseOrigin,

    /// The base origin could not be parsed as an absolute URL with a host.
    #[error("Configuration error: invalid base origin '{value}': {reason}")]
    InvalidBaseOrigin {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The base origin uses a scheme other than `http` or `https`.
    #[error("Configuration error: unsupported scheme '{scheme}'")]
    UnsupportedScheme {
        /// The rejected scheme.
        scheme: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Configuration error: HTTP client construction failed: {message}")]
    ClientConstruction {
        /// Description reported by the HTTP client builder.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Request descriptors
// ---------------------------------------------------------------------------

/// A request descriptor that cannot be normalized into a transport call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// The method string is not a known HTTP method.
    #[error("unknown HTTP method '{method}'")]
    UnknownMethod {
        /// The method as supplied by the caller.
        method: String,
    },

    /// The path is empty or not origin-relative.
    #[error("path '{path}' must be relative to the configured origin")]
    InvalidPath {
        /// The rejected path.
        path: String,
    },

    /// A body declared as JSON did not parse.
    #[error("body declared as JSON is malformed: {message}")]
    MalformedJson {
        /// Parser message.
        message: String,
    },

    /// A header name or value is not valid HTTP.
    #[error("invalid header '{name}'")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },

    /// A multipart part declares an unparseable MIME type.
    #[error("invalid MIME type '{mime}' on part '{part}'")]
    InvalidMimeType {
        /// Part name.
        part: String,
        /// The rejected MIME type.
        mime: String,
    },
}

// ---------------------------------------------------------------------------
// Transport failures
// ---------------------------------------------------------------------------

/// Failure of one transport call.
///
/// Only [`TransportFailure::Status`] carries an HTTP status; every other
/// variant means no usable response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    /// The server answered with a non-2xx status.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided error body (possibly empty).
        body: String,
    },

    /// No response was received (connection refused, DNS, timeout, ...).
    #[error("network failure: {message}")]
    Network {
        /// Description from the HTTP client.
        message: String,
    },

    /// A payload that does not have the expected shape (a typed response, or
    /// a request body that cannot be serialized).
    #[error("response could not be decoded: {message}")]
    Decode {
        /// Decoder message.
        message: String,
    },

    /// The request descriptor was rejected before anything was sent.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

impl TransportFailure {
    /// Returns the HTTP status when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the server reported a conflict (HTTP 409).
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}
