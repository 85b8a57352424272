//! End-to-end tests for the submit pipeline.

use std::sync::Arc;

use axum::http::StatusCode;
use contact_api::store::{KvStore, MemoryKv, SubmissionStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{client, contact_url, spawn_server, spawn_server_with_store, test_config, valid_body};

#[tokio::test]
async fn valid_submission_succeeds() {
    let (addr, shutdown) = spawn_server(test_config()).await;

    let res = client()
        .post(contact_url(addr))
        .json(&valid_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Your message has been sent successfully!");
    assert!(body["timestamp"].is_string());

    // Well-formed id: submission_<digits>_<alnum>.
    let id = body["id"].as_str().unwrap();
    let rest = id.strip_prefix("submission_").expect("id prefix");
    let (millis, suffix) = rest.split_once('_').expect("id separator");
    assert!(millis.chars().all(|c| c.is_ascii_digit()));
    assert!(!suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric()));

    shutdown.trigger();
}

#[tokio::test]
async fn stored_record_is_normalized() {
    let kv: Arc<dyn KvStore> = Arc::new(MemoryKv::new());
    let (addr, shutdown) = spawn_server_with_store(test_config(), Some(kv.clone())).await;

    let body = serde_json::json!({
        "name": "  Ada Lovelace  ",
        "email": "  Ada@Example.COM ",
        "message": format!("  {}  ", "m".repeat(60)),
        "cf-turnstile-response": "tok",
    });
    let res = client()
        .post(contact_url(addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let store = SubmissionStore::new(kv, 90);
    let page = store.list(10, None).await.unwrap();
    assert_eq!(page.submissions.len(), 1);
    let stored = &page.submissions[0];
    assert_eq!(stored.name, "Ada Lovelace");
    assert_eq!(stored.email, "ada@example.com");
    assert_eq!(stored.message, "m".repeat(60));
    assert_eq!(stored.ip, "127.0.0.1");
    assert_eq!(stored.country, "unknown");
    assert!(!stored.read);

    shutdown.trigger();
}

#[tokio::test]
async fn sixth_request_in_window_is_limited() {
    let mut config = test_config();
    config.rate_limit.max_requests = 5;
    let (addr, shutdown) = spawn_server(config).await;

    let client = client();
    for i in 0..5 {
        let res = client
            .post(contact_url(addr))
            .json(&valid_body())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "request {i} should pass");
    }

    let res = client
        .post(contact_url(addr))
        .json(&valid_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Too many requests. Please try again later.");

    shutdown.trigger();
}

#[tokio::test]
async fn failed_validation_still_consumes_budget() {
    let mut config = test_config();
    config.rate_limit.max_requests = 2;
    let (addr, shutdown) = spawn_server(config).await;

    let client = client();
    let bad = serde_json::json!({
        "name": "Al",
        "email": "not-an-email",
        "message": "m".repeat(60),
        "cf-turnstile-response": "tok",
    });
    for _ in 0..2 {
        let res = client.post(contact_url(addr)).json(&bad).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    // Budget is spent even though both attempts were rejected.
    let res = client
        .post(contact_url(addr))
        .json(&valid_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);

    shutdown.trigger();
}

#[tokio::test]
async fn unsupported_content_type_is_rejected() {
    let (addr, shutdown) = spawn_server(test_config()).await;

    let res = client()
        .post(contact_url(addr))
        .header("content-type", "text/plain")
        .body("name=x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Unsupported content type");

    shutdown.trigger();
}

#[tokio::test]
async fn form_encoded_body_is_accepted() {
    let (addr, shutdown) = spawn_server(test_config()).await;

    let message = "m".repeat(60);
    let res = client()
        .post(contact_url(addr))
        .form(&[
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("message", message.as_str()),
            ("cf-turnstile-response", "tok"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
}

#[tokio::test]
async fn missing_challenge_token_is_rejected() {
    let (addr, shutdown) = spawn_server(test_config()).await;

    let mut body = valid_body();
    body.as_object_mut().unwrap().remove("cf-turnstile-response");
    let res = client()
        .post(contact_url(addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Please complete the security challenge");

    shutdown.trigger();
}

#[tokio::test]
async fn validation_messages_name_first_failure_wins() {
    let (addr, shutdown) = spawn_server(test_config()).await;
    let client = client();

    let cases = [
        (
            serde_json::json!({
                "name": "", "email": "", "message": "",
                "cf-turnstile-response": "tok",
            }),
            "All fields are required",
        ),
        (
            serde_json::json!({
                "name": "Ada", "email": "nope", "message": "m".repeat(60),
                "cf-turnstile-response": "tok",
            }),
            "Invalid email address",
        ),
        (
            serde_json::json!({
                "name": "A", "email": "a@b.com", "message": "m".repeat(60),
                "cf-turnstile-response": "tok",
            }),
            "Name must be between 2 and 200 characters",
        ),
        (
            serde_json::json!({
                "name": "Ada", "email": "a@b.com", "message": "too short",
                "cf-turnstile-response": "tok",
            }),
            "Message must be between 50 and 8000 characters",
        ),
    ];

    for (body, expected) in cases {
        let res = client.post(contact_url(addr)).json(&body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json: serde_json::Value = res.json().await.unwrap();
        assert_eq!(json["error"], expected);
    }

    shutdown.trigger();
}

#[tokio::test]
async fn boundary_name_lengths() {
    let (addr, shutdown) = spawn_server(test_config()).await;
    let client = client();

    for (len, expected) in [(1, 400u16), (2, 200), (200, 200), (201, 400)] {
        let body = serde_json::json!({
            "name": "n".repeat(len),
            "email": "a@b.com",
            "message": "m".repeat(60),
            "cf-turnstile-response": "tok",
        });
        let res = client.post(contact_url(addr)).json(&body).send().await.unwrap();
        assert_eq!(res.status().as_u16(), expected, "name length {len}");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn unconfigured_store_answers_503() {
    let (addr, shutdown) = spawn_server_with_store(test_config(), None).await;

    let res = client()
        .post(contact_url(addr))
        .json(&valid_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    shutdown.trigger();
}

#[tokio::test]
async fn error_responses_carry_cors_headers() {
    let (addr, shutdown) = spawn_server_with_store(test_config(), None).await;

    let res = client()
        .post(contact_url(addr))
        .header("origin", "http://localhost:8788")
        .json(&valid_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:8788"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn challenge_verification_gates_the_pipeline() {
    let verify = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/siteverify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error-codes": ["invalid-input-response"]
        })))
        .mount(&verify)
        .await;

    let mut config = test_config();
    config.challenge.secret_key = Some("secret-1".into());
    config.challenge.verify_url = format!("{}/siteverify", verify.uri());
    let (addr, shutdown) = spawn_server(config).await;

    let res = client()
        .post(contact_url(addr))
        .json(&valid_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Security challenge verification failed");

    shutdown.trigger();
}

#[tokio::test]
async fn challenge_pass_lets_submission_through() {
    let verify = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/siteverify"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "success": true })),
        )
        .mount(&verify)
        .await;

    let mut config = test_config();
    config.challenge.secret_key = Some("secret-1".into());
    config.challenge.verify_url = format!("{}/siteverify", verify.uri());
    let (addr, shutdown) = spawn_server(config).await;

    let res = client()
        .post(contact_url(addr))
        .json(&valid_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
}

#[tokio::test]
async fn verifier_outage_fails_the_request() {
    let verify = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&verify)
        .await;

    let mut config = test_config();
    config.challenge.secret_key = Some("secret-1".into());
    config.challenge.verify_url = format!("{}/siteverify", verify.uri());
    let (addr, shutdown) = spawn_server(config).await;

    let res = client()
        .post(contact_url(addr))
        .json(&valid_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    shutdown.trigger();
}
