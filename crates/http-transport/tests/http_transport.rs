//! End-to-end tests for `HttpTransport` against a local mock server.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use http_transport::{HttpTransport, TransportConfig};
use serde_json::{json, Value};
use signup::api::{sign_up_descriptor, SignUpBody, SignUpDto, SIGN_UP_PATH};
use signup::transport::{BodyInit, FetchOptions, RequestConfig};
use signup::{
    Attachment, AuthenticationClient, CallDescriptor, Catalog, CurrencyCode, DescriptorError,
    Locale, Method, SubmissionOutcome, Transport, TransportFailure,
};
use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer) -> HttpTransport {
    let config = TransportConfig::parse(&server.uri()).expect("mock server uri is a bare origin");
    HttpTransport::new(config).expect("client builds")
}

fn sign_up_body(avatar: Option<Attachment>) -> SignUpBody {
    SignUpBody {
        dto: SignUpDto {
            email: "ada@example.com".to_owned(),
            password: "Abcdefg1".to_owned(),
            full_name: "Ada Lovelace".to_owned(),
            currency_code: CurrencyCode::Uah,
        },
        avatar,
    }
}

fn get(url: &str) -> CallDescriptor {
    FetchOptions {
        url: url.to_owned(),
        ..FetchOptions::default()
    }
    .into()
}

#[tokio::test]
async fn success_returns_the_decoded_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGN_UP_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = sign_up_descriptor(&sign_up_body(None)).expect("dto serializes");
    let value = transport_for(&server)
        .execute(descriptor)
        .await
        .expect("2xx succeeds");

    assert_eq!(value, json!({ "id": 42 }));
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let value = transport_for(&server)
        .execute(get("/ping"))
        .await
        .expect("204 succeeds");

    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn plain_text_created_response_is_a_successful_sign_up() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGN_UP_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_string("Created"))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthenticationClient::new(Arc::new(transport_for(&server)));
    let result = client.sign_up(&sign_up_body(None)).await;

    assert_eq!(result, Ok(Value::String("Created".to_owned())));
    assert_eq!(
        SubmissionOutcome::classify(result, &Catalog::new(Locale::En)),
        SubmissionOutcome::Success
    );
}

#[tokio::test]
async fn conflict_status_carries_the_server_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGN_UP_PATH))
        .respond_with(ResponseTemplate::new(409).set_body_string("email already registered"))
        .mount(&server)
        .await;

    let descriptor = sign_up_descriptor(&sign_up_body(None)).expect("dto serializes");
    let failure = transport_for(&server)
        .execute(descriptor)
        .await
        .expect_err("409 fails");

    assert_eq!(
        failure,
        TransportFailure::Status {
            status: 409,
            body: "email already registered".to_owned(),
        }
    );
    assert!(failure.is_conflict());
}

#[tokio::test]
async fn server_errors_are_not_conflicts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let failure = transport_for(&server)
        .execute(get("/anything"))
        .await
        .expect_err("500 fails");

    assert_eq!(failure.status(), Some(500));
    assert!(!failure.is_conflict());
}

#[tokio::test]
async fn sign_up_is_sent_as_multipart_with_dto_and_avatar_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGN_UP_PATH))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let avatar = Attachment::new("avatar.png", "image/png", vec![0x89, b'P', b'N', b'G']);
    let descriptor = sign_up_descriptor(&sign_up_body(Some(avatar))).expect("dto serializes");
    transport_for(&server)
        .execute(descriptor)
        .await
        .expect("multipart upload succeeds");

    let requests = server.received_requests().await.expect("recording enabled");
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="dto""#));
    assert!(body.contains(r#""fullName":"Ada Lovelace""#));
    assert!(body.contains(r#""currencyCode":"UAH""#));
    assert!(body.contains(r#"name="avatar""#));
    assert!(body.contains(r#"filename="avatar.png""#));
    assert!(body.contains("Content-Type: image/png"));
}

#[tokio::test]
async fn json_text_bodies_are_sent_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/profile"))
        .and(body_json(json!({ "fullName": "Ada" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor: CallDescriptor = FetchOptions {
        url: "/profile".to_owned(),
        method: Some("put".to_owned()),
        headers: Some(vec![("Content-Type".to_owned(), "application/json".to_owned())]),
        body: Some(BodyInit::Text(r#"{"fullName":"Ada"}"#.to_owned())),
    }
    .into();

    let value = transport_for(&server)
        .execute(descriptor)
        .await
        .expect("json put succeeds");
    assert_eq!(value, json!({ "ok": true }));
}

#[tokio::test]
async fn config_params_become_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor: CallDescriptor = RequestConfig {
        url: "/accounts".to_owned(),
        method: Some(Method::Get),
        params: vec![("page".to_owned(), "2".to_owned())],
        ..RequestConfig::default()
    }
    .into();

    let value = transport_for(&server)
        .execute(descriptor)
        .await
        .expect("query call succeeds");
    assert_eq!(value, json!([]));
}

#[tokio::test]
async fn seeded_session_cookie_is_sent_with_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "ada@example.com" })))
        .expect(1)
        .mount(&server)
        .await;

    let config = TransportConfig::parse(&server.uri())
        .expect("valid origin")
        .with_session_cookie("session=abc123");
    let transport = HttpTransport::new(config).expect("client builds");

    transport.execute(get("/me")).await.expect("cookie matched");
}

#[tokio::test]
async fn cookies_are_withheld_without_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = TransportConfig::parse(&server.uri())
        .expect("valid origin")
        .with_credentials(false)
        .with_session_cookie("session=abc123");
    let transport = HttpTransport::new(config).expect("client builds");

    transport.execute(get("/me")).await.expect("call succeeds");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("cookie").is_none());
}

#[tokio::test]
async fn unreachable_origin_is_a_network_failure() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port");
        listener.local_addr().expect("bound address").port()
    };
    let config = TransportConfig::parse(&format!("http://127.0.0.1:{port}"))
        .expect("valid origin")
        .with_timeout(Duration::from_secs(2));
    let transport = HttpTransport::new(config).expect("client builds");

    let failure = transport
        .execute(get("/ping"))
        .await
        .expect_err("nothing listens");

    assert!(matches!(failure, TransportFailure::Network { .. }));
    assert_eq!(failure.status(), None);
}

#[tokio::test]
async fn absolute_urls_are_rejected_before_sending() {
    let server = MockServer::start().await;

    let failure = transport_for(&server)
        .execute(get("https://elsewhere.example.com/steal"))
        .await
        .expect_err("absolute url rejected");

    assert_eq!(
        failure,
        TransportFailure::Descriptor(DescriptorError::InvalidPath {
            path: "https://elsewhere.example.com/steal".to_owned(),
        })
    );
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}
