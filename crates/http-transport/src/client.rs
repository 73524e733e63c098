//! Reqwest-backed transport.
//!
//! This adapter owns transport details only: descriptor normalization, URL
//! resolution against the configured origin, multipart encoding, status
//! mapping, and JSON decoding. It never retries.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use signup::errors::DescriptorError;
use signup::transport::{MultipartForm, PartContent};
use signup::{
    CallDescriptor, ConfigurationError, Method, RequestBody, Transport, TransportCall,
    TransportFailure,
};

use crate::config::TransportConfig;

/// Transport that performs real HTTP calls against one origin.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: TransportConfig,
}

impl HttpTransport {
    /// Builds the adapter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ClientConstruction`] when the reqwest
    /// client cannot be built (e.g. no TLS backend).
    pub fn new(config: TransportConfig) -> Result<Self, ConfigurationError> {
        let mut builder = Client::builder().timeout(config.timeout());
        if config.credentials_enabled() {
            let jar = Jar::default();
            for cookie in config.session_cookies() {
                jar.add_cookie_str(cookie, config.base_origin());
            }
            builder = builder.cookie_provider(Arc::new(jar));
        }
        let client = builder
            .build()
            .map_err(|error| ConfigurationError::ClientConstruction {
                message: error.to_string(),
            })?;

        tracing::info!(
            origin = %config.base_origin(),
            credentials = config.credentials_enabled(),
            "http transport ready"
        );
        Ok(Self { client, config })
    }

    fn resolve(&self, call: &TransportCall) -> Result<Url, DescriptorError> {
        let mut url = self
            .config
            .base_origin()
            .join(&call.path)
            .map_err(|_| DescriptorError::InvalidPath {
                path: call.path.clone(),
            })?;
        if url.origin() != self.config.base_origin().origin() {
            return Err(DescriptorError::InvalidPath {
                path: call.path.clone(),
            });
        }
        if !call.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&call.query);
        }
        Ok(url)
    }

    fn build(&self, call: TransportCall) -> Result<RequestBuilder, DescriptorError> {
        let url = self.resolve(&call)?;
        let multipart = matches!(call.body, Some(RequestBody::Multipart(_)));

        let mut request = self.client.request(to_reqwest_method(call.method), url);
        for (name, value) in &call.headers {
            // The multipart encoder writes its own content type with the boundary.
            if multipart && name == CONTENT_TYPE.as_str() {
                continue;
            }
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| DescriptorError::InvalidHeader { name: name.clone() })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| DescriptorError::InvalidHeader { name: name.clone() })?;
            request = request.header(header_name, header_value);
        }

        request = match call.body {
            None => request,
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::Raw {
                bytes,
                content_type,
            }) => {
                let request = request.body(bytes);
                match content_type {
                    Some(ct) if !call.headers.contains_key(CONTENT_TYPE.as_str()) => {
                        let value = HeaderValue::from_str(&ct).map_err(|_| {
                            DescriptorError::InvalidHeader {
                                name: CONTENT_TYPE.as_str().to_owned(),
                            }
                        })?;
                        request.header(CONTENT_TYPE, value)
                    }
                    _ => request,
                }
            }
            Some(RequestBody::Multipart(form)) => request.multipart(to_reqwest_form(form)?),
        };
        Ok(request)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(
        name = "transport.execute",
        skip_all,
        fields(method = tracing::field::Empty, path = tracing::field::Empty, status = tracing::field::Empty)
    )]
    async fn execute(&self, descriptor: CallDescriptor) -> Result<Value, TransportFailure> {
        let call = TransportCall::try_from(descriptor)?;
        let span = tracing::Span::current();
        span.record("method", call.method.as_str());
        span.record("path", call.path.as_str());

        let response = self
            .build(call)?
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        span.record("status", status.as_u16());
        let body = response.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "non-success response");
            return Err(TransportFailure::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_owned(),
            });
        }
        Ok(decode_body(&body))
    }
}

/// Any 2xx body is a success: empty bodies become `null` and bodies that are
/// not JSON are handed back as text.
fn decode_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body).unwrap_or_else(|error| {
        tracing::debug!(%error, "2xx body is not JSON; returning it as text");
        Value::String(String::from_utf8_lossy(body).trim().to_owned())
    })
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

fn to_reqwest_form(form: MultipartForm) -> Result<Form, DescriptorError> {
    let mut encoded = Form::new();
    for part in form.into_parts() {
        let name = part.name;
        let encoded_part = match part.content {
            PartContent::Json(value) => Part::text(value.to_string())
                .mime_str("application/json")
                .map_err(|_| DescriptorError::InvalidMimeType {
                    part: name.clone(),
                    mime: "application/json".to_owned(),
                })?,
            PartContent::Text(text) => Part::text(text),
            PartContent::File {
                file_name,
                mime_type,
                bytes,
            } => Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(&mime_type)
                .map_err(|_| DescriptorError::InvalidMimeType {
                    part: name.clone(),
                    mime: mime_type.clone(),
                })?,
        };
        encoded = encoded.part(name, encoded_part);
    }
    Ok(encoded)
}

fn map_transport_error(error: reqwest::Error) -> TransportFailure {
    let message = if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    };
    TransportFailure::Network { message }
}
