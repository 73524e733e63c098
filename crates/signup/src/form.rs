//! The user-editable sign-up form.
//!
//! [`FormInput`] is created defaulted when the form mounts, mutated field by
//! field, and discarded after a successful submission. It is never sent over
//! the wire directly; see [`crate::pipeline::SubmissionRequest`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// One field of the sign-up form.
///
/// Validation errors and server conflicts are always attached to exactly one
/// of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Account e-mail address.
    Email,
    /// Chosen password.
    Password,
    /// Password repeated for confirmation.
    ConfirmPassword,
    /// Display name.
    FullName,
    /// Account currency.
    CurrencyCode,
    /// Optional profile picture.
    Avatar,
}

impl Field {
    /// Returns the field's wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
            Field::FullName => "fullName",
            Field::CurrencyCode => "currencyCode",
            Field::Avatar => "avatar",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// Account currency offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    /// Ukrainian hryvnia; preselected when the form mounts.
    #[default]
    Uah,
    /// US dollar.
    Usd,
    /// Euro.
    Eur,
}

impl CurrencyCode {
    /// Returns the ISO 4217 code.
    pub fn as_str(self) -> &'static str {
        match self {
            CurrencyCode::Uah => "UAH",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the offered currencies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency code '{0}'")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UAH" => Ok(CurrencyCode::Uah),
            "USD" => Ok(CurrencyCode::Usd),
            "EUR" => Ok(CurrencyCode::Eur),
            _ => Err(UnknownCurrency(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// A file selected by the user, held in memory until submission.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl Attachment {
    /// Wraps a selected file.
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Original file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// MIME type reported for the file (e.g. `"image/png"`).
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Raw file content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Form input
// ---------------------------------------------------------------------------

/// Current values of the sign-up form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    /// Account e-mail address.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Password repeated for confirmation.
    pub confirm_password: String,
    /// Display name.
    pub full_name: String,
    /// Account currency.
    pub currency_code: CurrencyCode,
    /// Optional profile picture; at most one file.
    pub avatar: Option<Attachment>,
}

impl std::fmt::Debug for FormInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("currency_code", &self.currency_code)
            .field("avatar", &self.avatar)
            .finish()
    }
}
