//! Transport adapter contract.
//!
//! Generated API operations describe a call with a [`CallDescriptor`]. Two
//! descriptor shapes exist because the generator changed its calling
//! convention between versions:
//!
//! - [`FetchOptions`]: URL plus a fetch-style options object (method string,
//!   header pairs, body init).
//! - [`RequestConfig`]: a client-config object (typed method, header map,
//!   query params, `data` payload).
//!
//! Both are normalized by [`TransportCall::try_from`] into one canonical
//! [`TransportCall`]. Nothing past that conversion looks at the original
//! shape. Concrete transports implement [`Transport`].

use std::collections::BTreeMap;
use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{DescriptorError, TransportFailure};

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// HTTP method of a transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
}

impl Method {
    /// Returns the upper-case method token.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(DescriptorError::UnknownMethod {
                method: s.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

/// Content of one multipart part.
#[derive(Clone, PartialEq)]
pub enum PartContent {
    /// Structured part, serialised as `application/json`.
    Json(Value),
    /// Plain text part.
    Text(String),
    /// Binary file part.
    File {
        /// File name sent in the part's content disposition.
        file_name: String,
        /// MIME type of the file.
        mime_type: String,
        /// Raw file content.
        bytes: Vec<u8>,
    },
}

impl std::fmt::Debug for PartContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartContent::Json(_) => f.write_str("Json(..)"),
            PartContent::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            PartContent::File {
                file_name,
                mime_type,
                bytes,
            } => f
                .debug_struct("File")
                .field("file_name", file_name)
                .field("mime_type", mime_type)
                .field("size", &bytes.len())
                .finish(),
        }
    }
}

/// One named part of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Form field name.
    pub name: String,
    /// Part content.
    pub content: PartContent,
}

/// An ordered multipart form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

impl MultipartForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a JSON part.
    pub fn json(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parts.push(Part {
            name: name.into(),
            content: PartContent::Json(value),
        });
        self
    }

    /// Appends a text part.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part {
            name: name.into(),
            content: PartContent::Text(value.into()),
        });
        self
    }

    /// Appends a file part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            content: PartContent::File {
                file_name: file_name.into(),
                mime_type: mime_type.into(),
                bytes,
            },
        });
        self
    }

    /// Parts in insertion order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Finds the first part named `name`.
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Consumes the form, returning its parts.
    pub fn into_parts(self) -> Vec<Part> {
        self.parts
    }
}

// ---------------------------------------------------------------------------
// Descriptor shapes
// ---------------------------------------------------------------------------

/// Fetch-style body init.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyInit {
    /// Pre-serialised text (JSON when the content type says so).
    Text(String),
    /// Opaque bytes.
    Bytes(Vec<u8>),
    /// Multipart form data.
    FormData(MultipartForm),
}

/// Fetch-style call: URL plus a `RequestInit`-like options object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOptions {
    /// Origin-relative URL, may carry a query string.
    pub url: String,
    /// Method token; `None` means `GET`.
    pub method: Option<String>,
    /// Header pairs, in the order the caller supplied them.
    pub headers: Option<Vec<(String, String)>>,
    /// Request body.
    pub body: Option<BodyInit>,
}

/// Client-config `data` payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestData {
    /// Structured JSON payload.
    Json(Value),
    /// Multipart form data.
    FormData(MultipartForm),
}

/// Client-config style call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    /// Origin-relative URL.
    pub url: String,
    /// Method; `None` means `GET`.
    pub method: Option<Method>,
    /// Header map.
    pub headers: BTreeMap<String, String>,
    /// Query parameters appended to the URL.
    pub params: Vec<(String, String)>,
    /// Request payload.
    pub data: Option<RequestData>,
}

/// A request as produced by generated client code, in either shape.
#[derive(Debug, Clone, PartialEq)]
pub enum CallDescriptor {
    /// Fetch-style descriptor.
    Fetch(FetchOptions),
    /// Client-config descriptor.
    Config(RequestConfig),
}

impl From<FetchOptions> for CallDescriptor {
    fn from(options: FetchOptions) -> Self {
        CallDescriptor::Fetch(options)
    }
}

impl From<RequestConfig> for CallDescriptor {
    fn from(config: RequestConfig) -> Self {
        CallDescriptor::Config(config)
    }
}

// ---------------------------------------------------------------------------
// Canonical call
// ---------------------------------------------------------------------------

/// Canonical request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document.
    Json(Value),
    /// Multipart form, possibly with binary parts.
    Multipart(MultipartForm),
    /// Opaque bytes with an optional content type.
    Raw {
        /// Body bytes.
        bytes: Vec<u8>,
        /// Declared content type, if any.
        content_type: Option<String>,
    },
}

/// One normalized outgoing call, relative to the configured origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportCall {
    /// HTTP method.
    pub method: Method,
    /// Origin-relative path, always starting with `/`; may carry a query string.
    pub path: String,
    /// Extra query parameters.
    pub query: Vec<(String, String)>,
    /// Headers, names lower-cased.
    pub headers: BTreeMap<String, String>,
    /// Body, if any.
    pub body: Option<RequestBody>,
}

const CONTENT_TYPE: &str = "content-type";

impl TryFrom<CallDescriptor> for TransportCall {
    type Error = DescriptorError;

    fn try_from(descriptor: CallDescriptor) -> Result<Self, Self::Error> {
        match descriptor {
            CallDescriptor::Fetch(options) => from_fetch(options),
            CallDescriptor::Config(config) => from_config(config),
        }
    }
}

fn from_fetch(options: FetchOptions) -> Result<TransportCall, DescriptorError> {
    let method = match options.method.as_deref() {
        Some(raw) => raw.parse()?,
        None => Method::Get,
    };
    let headers = normalize_headers(options.headers.unwrap_or_default());
    let body = match options.body {
        None => None,
        Some(BodyInit::FormData(form)) => Some(RequestBody::Multipart(form)),
        Some(BodyInit::Bytes(bytes)) => Some(RequestBody::Raw {
            bytes,
            content_type: headers.get(CONTENT_TYPE).cloned(),
        }),
        Some(BodyInit::Text(text)) => Some(text_body(text, headers.get(CONTENT_TYPE))?),
    };

    Ok(TransportCall {
        method,
        path: checked_path(options.url)?,
        query: Vec::new(),
        headers,
        body,
    })
}

fn from_config(config: RequestConfig) -> Result<TransportCall, DescriptorError> {
    let body = config.data.map(|data| match data {
        RequestData::Json(value) => RequestBody::Json(value),
        RequestData::FormData(form) => RequestBody::Multipart(form),
    });

    Ok(TransportCall {
        method: config.method.unwrap_or_default(),
        path: checked_path(config.url)?,
        query: config.params,
        headers: normalize_headers(config.headers),
        body,
    })
}

fn normalize_headers<I>(headers: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    headers
        .into_iter()
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value))
        .collect()
}

fn text_body(text: String, content_type: Option<&String>) -> Result<RequestBody, DescriptorError> {
    let is_json = content_type.is_some_and(|ct| {
        ct.split(';')
            .next()
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
    });
    if is_json {
        let value = serde_json::from_str(&text).map_err(|error| DescriptorError::MalformedJson {
            message: error.to_string(),
        })?;
        return Ok(RequestBody::Json(value));
    }

    Ok(RequestBody::Raw {
        bytes: text.into_bytes(),
        content_type: content_type.cloned(),
    })
}

fn checked_path(url: String) -> Result<String, DescriptorError> {
    // Protocol-relative ("//host/...") URLs would escape the configured origin.
    if url.starts_with('/') && !url.starts_with("//") {
        Ok(url)
    } else {
        Err(DescriptorError::InvalidPath { path: url })
    }
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Executes one call against the backend.
///
/// Implementations return the decoded JSON body for any 2xx status (`null`
/// for an empty body, a JSON string for a body that is not JSON) and never
/// retry. Non-2xx statuses map to
/// [`TransportFailure::Status`]; missing responses to
/// [`TransportFailure::Network`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Normalizes `descriptor` and performs the call.
    async fn execute(&self, descriptor: CallDescriptor) -> Result<Value, TransportFailure>;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn form() -> MultipartForm {
        MultipartForm::new()
            .json("dto", json!({ "email": "a@b.com" }))
            .file("avatar", "a.png", "image/png", vec![1, 2, 3])
    }

    #[test]
    fn both_shapes_normalize_to_the_same_call() {
        let fetch = CallDescriptor::from(FetchOptions {
            url: "/auth/sign-up".to_owned(),
            method: Some("post".to_owned()),
            headers: Some(vec![("X-Trace".to_owned(), "abc".to_owned())]),
            body: Some(BodyInit::FormData(form())),
        });
        let config = CallDescriptor::from(RequestConfig {
            url: "/auth/sign-up".to_owned(),
            method: Some(Method::Post),
            headers: BTreeMap::from([("x-trace".to_owned(), "abc".to_owned())]),
            params: Vec::new(),
            data: Some(RequestData::FormData(form())),
        });

        let from_fetch = TransportCall::try_from(fetch).expect("fetch shape");
        let from_config = TransportCall::try_from(config).expect("config shape");
        assert_eq!(from_fetch, from_config);
        assert_eq!(from_fetch.method, Method::Post);
        assert_eq!(from_fetch.headers.get("x-trace"), Some(&"abc".to_owned()));
    }

    #[test]
    fn json_text_bodies_become_structured() {
        let call = TransportCall::try_from(CallDescriptor::Fetch(FetchOptions {
            url: "/things".to_owned(),
            method: Some("PUT".to_owned()),
            headers: Some(vec![(
                "Content-Type".to_owned(),
                "application/json; charset=utf-8".to_owned(),
            )]),
            body: Some(BodyInit::Text(r#"{"a":1}"#.to_owned())),
        }))
        .expect("normalizes");

        assert_eq!(call.body, Some(RequestBody::Json(json!({ "a": 1 }))));

        let config = TransportCall::try_from(CallDescriptor::Config(RequestConfig {
            url: "/things".to_owned(),
            method: Some(Method::Put),
            data: Some(RequestData::Json(json!({ "a": 1 }))),
            headers: BTreeMap::from([(
                "content-type".to_owned(),
                "application/json; charset=utf-8".to_owned(),
            )]),
            ..RequestConfig::default()
        }))
        .expect("normalizes");
        assert_eq!(call, config);
    }

    #[test]
    fn malformed_json_text_is_rejected() {
        let error = TransportCall::try_from(CallDescriptor::Fetch(FetchOptions {
            url: "/things".to_owned(),
            headers: Some(vec![("content-type".to_owned(), "application/json".to_owned())]),
            body: Some(BodyInit::Text("{".to_owned())),
            ..FetchOptions::default()
        }))
        .expect_err("must fail");
        assert!(matches!(error, DescriptorError::MalformedJson { .. }));
    }

    #[test]
    fn plain_text_bodies_stay_raw() {
        let call = TransportCall::try_from(CallDescriptor::Fetch(FetchOptions {
            url: "/notes".to_owned(),
            method: Some("POST".to_owned()),
            headers: Some(vec![("content-type".to_owned(), "text/plain".to_owned())]),
            body: Some(BodyInit::Text("hello".to_owned())),
        }))
        .expect("normalizes");
        assert_eq!(
            call.body,
            Some(RequestBody::Raw {
                bytes: b"hello".to_vec(),
                content_type: Some("text/plain".to_owned()),
            })
        );
    }

    #[test]
    fn missing_method_defaults_to_get_in_both_shapes() {
        let fetch = TransportCall::try_from(CallDescriptor::Fetch(FetchOptions {
            url: "/me".to_owned(),
            ..FetchOptions::default()
        }))
        .expect("fetch");
        let config = TransportCall::try_from(CallDescriptor::Config(RequestConfig {
            url: "/me".to_owned(),
            ..RequestConfig::default()
        }))
        .expect("config");
        assert_eq!(fetch.method, Method::Get);
        assert_eq!(fetch, config);
    }

    #[rstest]
    #[case("")]
    #[case("auth/sign-up")]
    #[case("https://evil.example/auth")]
    #[case("//evil.example/auth")]
    fn rejects_paths_outside_the_origin(#[case] url: &str) {
        let error = TransportCall::try_from(CallDescriptor::Config(RequestConfig {
            url: url.to_owned(),
            ..RequestConfig::default()
        }))
        .expect_err("must fail");
        assert_eq!(
            error,
            DescriptorError::InvalidPath {
                path: url.to_owned()
            }
        );
    }

    #[test]
    fn unknown_method_strings_are_rejected() {
        let error = TransportCall::try_from(CallDescriptor::Fetch(FetchOptions {
            url: "/x".to_owned(),
            method: Some("BREW".to_owned()),
            ..FetchOptions::default()
        }))
        .expect_err("must fail");
        assert_eq!(
            error,
            DescriptorError::UnknownMethod {
                method: "BREW".to_owned()
            }
        );
    }

    #[test]
    fn config_params_are_carried_as_query() {
        let call = TransportCall::try_from(CallDescriptor::Config(RequestConfig {
            url: "/search".to_owned(),
            params: vec![("q".to_owned(), "coffee".to_owned())],
            ..RequestConfig::default()
        }))
        .expect("normalizes");
        assert_eq!(call.query, vec![("q".to_owned(), "coffee".to_owned())]);
    }

    #[test]
    fn multipart_debug_hides_file_content() {
        let rendered = format!("{:?}", form());
        assert!(rendered.contains("size: 3"));
        assert!(!rendered.contains("[1, 2, 3]"));
    }
}
