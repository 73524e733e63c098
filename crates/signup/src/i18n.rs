//! Localization provider.
//!
//! Every user-facing string in the sign-up flow is looked up through a
//! [`Localizer`]. The built-in [`Catalog`] carries Ukrainian (the default)
//! and English tables.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Key of one user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// E-mail address is syntactically invalid.
    InvalidEmail,
    /// Password shorter than the minimum length.
    PasswordTooShort,
    /// Password lacks an upper-case letter.
    PasswordUppercase,
    /// Password lacks a lower-case letter.
    PasswordLowercase,
    /// Password lacks a digit.
    PasswordNumber,
    /// Confirmation left empty.
    ConfirmRequired,
    /// Generic required field.
    Required,
    /// Confirmation differs from the password.
    PasswordMismatch,
    /// Attachment exceeds the size limit.
    FileSize,
    /// Attachment is not an accepted image type.
    FileType,
    /// The e-mail address is already registered.
    EmailExists,
    /// Account created.
    SignUpSuccess,
    /// Generic failure notification.
    GenericError,
    /// Label of the submit control while pending.
    Loading,
    /// Sign-up action label.
    SignUp,
}

impl MessageKey {
    /// Returns the dotted lookup key.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::InvalidEmail => "auth.errors.invalidEmail",
            MessageKey::PasswordTooShort => "auth.errors.tooShort",
            MessageKey::PasswordUppercase => "auth.errors.uppercase",
            MessageKey::PasswordLowercase => "auth.errors.lowercase",
            MessageKey::PasswordNumber => "auth.errors.number",
            MessageKey::ConfirmRequired => "auth.errors.confirmRequired",
            MessageKey::Required => "auth.errors.required",
            MessageKey::PasswordMismatch => "auth.errors.mismatch",
            MessageKey::FileSize => "auth.errors.fileSize",
            MessageKey::FileType => "auth.errors.fileType",
            MessageKey::EmailExists => "auth.emailExists",
            MessageKey::SignUpSuccess => "auth.signUpSuccess",
            MessageKey::GenericError => "common.error",
            MessageKey::Loading => "common.loading",
            MessageKey::SignUp => "signUp",
        }
    }
}

/// Maps message keys to human-readable text.
pub trait Localizer: Send + Sync {
    /// Returns the localized text for `key`.
    fn message(&self, key: MessageKey) -> String;
}

// ---------------------------------------------------------------------------
// Built-in catalog
// ---------------------------------------------------------------------------

/// Languages shipped with the built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Ukrainian.
    #[default]
    Ua,
    /// English.
    En,
}

/// Returned when a locale tag is not shipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale '{0}'")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ua" | "uk" => Ok(Locale::Ua),
            "en" => Ok(Locale::En),
            _ => Err(UnknownLocale(s.to_owned())),
        }
    }
}

/// Static message tables for every [`Locale`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog {
    locale: Locale,
}

impl Catalog {
    /// Creates a catalog serving `locale`.
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// The locale this catalog serves.
    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl Localizer for Catalog {
    fn message(&self, key: MessageKey) -> String {
        match self.locale {
            Locale::Ua => ukrainian(key),
            Locale::En => english(key),
        }
        .to_owned()
    }
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::InvalidEmail => "Enter a valid email address",
        MessageKey::PasswordTooShort => "Password must be at least 8 characters",
        MessageKey::PasswordUppercase => "Password must contain an uppercase letter",
        MessageKey::PasswordLowercase => "Password must contain a lowercase letter",
        MessageKey::PasswordNumber => "Password must contain a number",
        MessageKey::ConfirmRequired => "Confirm your password",
        MessageKey::Required => "This field is required",
        MessageKey::PasswordMismatch => "Passwords do not match",
        MessageKey::FileSize => "File must be 2 MB or smaller",
        MessageKey::FileType => "Only JPEG, PNG and GIF images are allowed",
        MessageKey::EmailExists => "An account with this email already exists",
        MessageKey::SignUpSuccess => "Account created. Redirecting to sign in...",
        MessageKey::GenericError => "Something went wrong. Please try again later",
        MessageKey::Loading => "Loading...",
        MessageKey::SignUp => "Sign up",
    }
}

fn ukrainian(key: MessageKey) -> &'static str {
    match key {
        MessageKey::InvalidEmail => "Введіть коректну електронну адресу",
        MessageKey::PasswordTooShort => "Пароль має містити щонайменше 8 символів",
        MessageKey::PasswordUppercase => "Пароль має містити велику літеру",
        MessageKey::PasswordLowercase => "Пароль має містити малу літеру",
        MessageKey::PasswordNumber => "Пароль має містити цифру",
        MessageKey::ConfirmRequired => "Підтвердіть пароль",
        MessageKey::Required => "Це поле обов'язкове",
        MessageKey::PasswordMismatch => "Паролі не збігаються",
        MessageKey::FileSize => "Файл має бути не більше 2 МБ",
        MessageKey::FileType => "Дозволені лише зображення JPEG, PNG та GIF",
        MessageKey::EmailExists => "Обліковий запис з цією адресою вже існує",
        MessageKey::SignUpSuccess => "Обліковий запис створено. Переходимо до входу...",
        MessageKey::GenericError => "Щось пішло не так. Спробуйте пізніше",
        MessageKey::Loading => "Завантаження...",
        MessageKey::SignUp => "Зареєструватися",
    }
}
