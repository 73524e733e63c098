//! Newtype domain identifiers.
//!
//! Navigation targets, submission attempts, and preview resources each get a
//! distinct type so an [`AttemptId`] can never be passed where a count is
//! expected, or a free-form string where a route is.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// A client-side navigation path (e.g. `"/login"`).
///
/// Always origin-relative: the value starts with a single `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePath(String);

impl RoutePath {
    /// Creates a route, returning `None` unless `value` is an origin-relative
    /// path.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        (value.starts_with('/') && !value.starts_with("//")).then_some(Self(value))
    }

    /// Sign-in page; the destination after a successful sign-up.
    pub fn sign_in() -> Self {
        Self("/login".to_owned())
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoutePath {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value.clone()).ok_or_else(|| format!("'{value}' is not an origin-relative path"))
    }
}

impl From<RoutePath> for String {
    fn from(route: RoutePath) -> Self {
        route.0
    }
}

impl std::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Submission attempts
// ---------------------------------------------------------------------------

/// Identifies one dispatched submission within a single form instance.
///
/// Issued in increasing order; a completion carrying an id other than the one
/// currently in flight is stale and ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(u64);

impl AttemptId {
    /// Returns the id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Preview resources
// ---------------------------------------------------------------------------

/// Identifies a live attachment preview minted by a
/// [`PreviewRenderer`](crate::preview::PreviewRenderer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreviewId(Uuid);

impl PreviewId {
    /// Generates a new random preview identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PreviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
