//! Typed API surface for the authentication endpoints.
//!
//! Mirrors what the schema-driven client generator emits: one model per
//! request schema, one descriptor builder per operation, and a client that
//! hands descriptors to whichever [`Transport`] was plugged in. Nothing here
//! knows how the call reaches the network.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::TransportFailure;
use crate::form::{Attachment, CurrencyCode};
use crate::transport::{BodyInit, CallDescriptor, FetchOptions, MultipartForm, Transport};

/// Path of the sign-up operation.
pub const SIGN_UP_PATH: &str = "/auth/sign-up";

/// Name of the structured multipart part.
pub const DTO_PART: &str = "dto";

/// Name of the binary multipart part.
pub const AVATAR_PART: &str = "avatar";

/// Structured part of the sign-up request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpDto {
    /// Account e-mail address.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Display name.
    pub full_name: String,
    /// Account currency.
    pub currency_code: CurrencyCode,
}

impl std::fmt::Debug for SignUpDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpDto")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("currency_code", &self.currency_code)
            .finish()
    }
}

/// Multipart body of the sign-up operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpBody {
    /// Structured account data.
    pub dto: SignUpDto,
    /// Optional avatar file.
    pub avatar: Option<Attachment>,
}

/// Builds the descriptor for `POST /auth/sign-up`.
pub fn sign_up_descriptor(body: &SignUpBody) -> Result<CallDescriptor, serde_json::Error> {
    let mut form = MultipartForm::new().json(DTO_PART, serde_json::to_value(&body.dto)?);
    if let Some(avatar) = &body.avatar {
        form = form.file(
            AVATAR_PART,
            avatar.file_name(),
            avatar.mime_type(),
            avatar.bytes().to_vec(),
        );
    }

    Ok(CallDescriptor::Fetch(FetchOptions {
        url: SIGN_UP_PATH.to_owned(),
        method: Some("POST".to_owned()),
        headers: None,
        body: Some(BodyInit::FormData(form)),
    }))
}

/// Client for the authentication operations.
#[derive(Clone)]
pub struct AuthenticationClient {
    transport: Arc<dyn Transport>,
}

impl AuthenticationClient {
    /// Creates a client over `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Registers a new account, returning the raw JSON response.
    pub async fn sign_up(&self, body: &SignUpBody) -> Result<Value, TransportFailure> {
        let descriptor = sign_up_descriptor(body).map_err(|error| TransportFailure::Decode {
            message: format!("sign-up request could not be serialised: {error}"),
        })?;
        self.transport.execute(descriptor).await
    }

    /// Registers a new account and decodes the response into `T`.
    pub async fn sign_up_typed<T>(&self, body: &SignUpBody) -> Result<T, TransportFailure>
    where
        T: DeserializeOwned,
    {
        let value = self.sign_up(body).await?;
        serde_json::from_value(value).map_err(|error| TransportFailure::Decode {
            message: error.to_string(),
        })
    }
}

impl std::fmt::Debug for AuthenticationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationClient").finish_non_exhaustive()
    }
}
