//! Sign-up schema and validation engine.
//!
//! The schema is an ordered table of [`RuleEntry`] values. Each entry names
//! the field its failure is reported under, which is not necessarily the field
//! it reads: the password confirmation check reads both password fields and
//! reports under [`Field::ConfirmPassword`] only.
//!
//! Validation is synchronous and side-effect free. The same input always
//! yields the same errors, in schema order.

use std::collections::BTreeMap;

use validator::ValidateEmail;

use crate::form::{Attachment, Field, FormInput};
use crate::i18n::MessageKey;

/// Largest accepted avatar, in bytes (2 MiB).
pub const MAX_AVATAR_BYTES: u64 = 2 * 1024 * 1024;

/// Minimum password length, in UTF-16 code units.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// MIME types accepted for the avatar.
pub const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// One independently reportable validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// E-mail is not syntactically valid.
    InvalidEmail,
    /// Password shorter than [`MIN_PASSWORD_CHARS`].
    TooShort,
    /// Password has no ASCII upper-case letter.
    Uppercase,
    /// Password has no ASCII lower-case letter.
    Lowercase,
    /// Password has no ASCII digit.
    Number,
    /// Confirmation is empty.
    ConfirmRequired,
    /// Full name is empty.
    Required,
    /// Confirmation differs from the password.
    Mismatch,
    /// Avatar larger than [`MAX_AVATAR_BYTES`].
    FileSize,
    /// Avatar MIME type not in [`ACCEPTED_IMAGE_TYPES`].
    FileType,
}

impl Rule {
    /// Message shown when this rule fails.
    pub fn message_key(self) -> MessageKey {
        match self {
            Rule::InvalidEmail => MessageKey::InvalidEmail,
            Rule::TooShort => MessageKey::PasswordTooShort,
            Rule::Uppercase => MessageKey::PasswordUppercase,
            Rule::Lowercase => MessageKey::PasswordLowercase,
            Rule::Number => MessageKey::PasswordNumber,
            Rule::ConfirmRequired => MessageKey::ConfirmRequired,
            Rule::Required => MessageKey::Required,
            Rule::Mismatch => MessageKey::PasswordMismatch,
            Rule::FileSize => MessageKey::FileSize,
            Rule::FileType => MessageKey::FileType,
        }
    }
}

/// A failed rule, attached to the field it reports under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidationError {
    /// Field the error is displayed under.
    pub field: Field,
    /// Rule that failed.
    pub rule: Rule,
}

/// One schema entry: a predicate over the whole input plus its target field.
pub struct RuleEntry {
    /// Field the failure is reported under.
    pub target: Field,
    /// Rule identity.
    pub rule: Rule,
    /// Fields the predicate reads. Blur of any of these re-evaluates the rule.
    pub reads: &'static [Field],
    passes: fn(&FormInput) -> bool,
}

impl RuleEntry {
    /// Returns `true` if `input` satisfies this rule.
    pub fn passes(&self, input: &FormInput) -> bool {
        (self.passes)(input)
    }
}

impl std::fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEntry")
            .field("target", &self.target)
            .field("rule", &self.rule)
            .field("reads", &self.reads)
            .finish()
    }
}

/// The sign-up schema, in reporting order.
pub static SIGN_UP_SCHEMA: [RuleEntry; 10] = [
    RuleEntry {
        target: Field::Email,
        rule: Rule::InvalidEmail,
        reads: &[Field::Email],
        passes: |input| input.email.validate_email(),
    },
    RuleEntry {
        target: Field::Password,
        rule: Rule::TooShort,
        reads: &[Field::Password],
        passes: |input| input.password.encode_utf16().count() >= MIN_PASSWORD_CHARS,
    },
    RuleEntry {
        target: Field::Password,
        rule: Rule::Uppercase,
        reads: &[Field::Password],
        passes: |input| input.password.chars().any(|c| c.is_ascii_uppercase()),
    },
    RuleEntry {
        target: Field::Password,
        rule: Rule::Lowercase,
        reads: &[Field::Password],
        passes: |input| input.password.chars().any(|c| c.is_ascii_lowercase()),
    },
    RuleEntry {
        target: Field::Password,
        rule: Rule::Number,
        reads: &[Field::Password],
        passes: |input| input.password.chars().any(|c| c.is_ascii_digit()),
    },
    RuleEntry {
        target: Field::ConfirmPassword,
        rule: Rule::ConfirmRequired,
        reads: &[Field::ConfirmPassword],
        passes: |input| !input.confirm_password.is_empty(),
    },
    RuleEntry {
        target: Field::FullName,
        rule: Rule::Required,
        reads: &[Field::FullName],
        passes: |input| !input.full_name.is_empty(),
    },
    RuleEntry {
        target: Field::Avatar,
        rule: Rule::FileSize,
        reads: &[Field::Avatar],
        passes: |input| input.avatar.as_ref().map_or(true, avatar_size_ok),
    },
    RuleEntry {
        target: Field::Avatar,
        rule: Rule::FileType,
        reads: &[Field::Avatar],
        passes: |input| input.avatar.as_ref().map_or(true, avatar_type_ok),
    },
    RuleEntry {
        target: Field::ConfirmPassword,
        rule: Rule::Mismatch,
        reads: &[Field::Password, Field::ConfirmPassword],
        passes: |input| input.password == input.confirm_password,
    },
];

fn avatar_size_ok(attachment: &Attachment) -> bool {
    attachment.size() <= MAX_AVATAR_BYTES
}

fn avatar_type_ok(attachment: &Attachment) -> bool {
    ACCEPTED_IMAGE_TYPES.contains(&attachment.mime_type())
}

/// Checks a single attachment against both avatar rules.
///
/// Absence is handled by the caller; an attachment that exists is judged on
/// size and type independently, size reported first.
pub fn validate_attachment(attachment: &Attachment) -> Vec<Rule> {
    let mut failed = Vec::new();
    if !avatar_size_ok(attachment) {
        failed.push(Rule::FileSize);
    }
    if !avatar_type_ok(attachment) {
        failed.push(Rule::FileType);
    }
    failed
}

/// Runs the whole schema and returns every failure, in schema order.
pub fn validate(input: &FormInput) -> Vec<ValidationError> {
    SIGN_UP_SCHEMA
        .iter()
        .filter(|entry| !entry.passes(input))
        .map(|entry| ValidationError {
            field: entry.target,
            rule: entry.rule,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-field view
// ---------------------------------------------------------------------------

/// First failing rule per field.
///
/// This is what the form displays: one message under each invalid field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, Rule>);

impl FieldErrors {
    /// Collapses a failure list to its first entry per field.
    pub fn from_errors(errors: &[ValidationError]) -> Self {
        let mut map = BTreeMap::new();
        for error in errors {
            map.entry(error.field).or_insert(error.rule);
        }
        Self(map)
    }

    /// Validates `input` and returns the per-field view.
    pub fn check(input: &FormInput) -> Self {
        Self::from_errors(&validate(input))
    }

    /// The rule shown under `field`, if any.
    pub fn get(&self, field: Field) -> Option<Rule> {
        self.0.get(&field).copied()
    }

    /// Returns `true` if no field has an error.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with an error.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(field, rule)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Rule)> + '_ {
        self.0.iter().map(|(field, rule)| (*field, *rule))
    }
}
