use std::{collections::HashMap, time::Duration};

use api_authorizer::{
    app::{build_router, build_state},
    config::Config,
    middleware::http::HttpLimits,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "my_alki_secret";
const METHOD_ARN: &str =
    "arn:aws:execute-api:us-east-1:123456789012:qsxrty/test/GET/mydemoresource/giveme";

fn sign(secret: &str, claims: Value) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

async fn router_with(config: Config) -> Router {
    let secrets = HashMap::from([("JWT_SECRET".to_string(), SECRET.to_string())]);
    let state = build_state(&config, &secrets).await.unwrap();
    build_router(
        state,
        HttpLimits {
            body_limit_bytes: 64 * 1024,
            timeout: Duration::from_secs(5),
        },
    )
}

async fn router() -> Router {
    router_with(Config::default()).await
}

async fn post_event(app: Router, event: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/authorize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(event.to_string()))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn token_event(token: &str) -> Value {
    json!({
        "type": "TOKEN",
        "authorizationToken": token,
        "methodArn": METHOD_ARN,
    })
}

fn assert_unauthorized(status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        &json!({ "error": { "code": "UNAUTHORIZED", "message": "Unauthorized" } })
    );
}

#[tokio::test]
async fn health_is_public() {
    let res = router()
        .await
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn valid_token_returns_allow_all_policy() {
    let token = sign(SECRET, json!({ "channel": "finance" }));
    let (status, body) = post_event(router().await, token_event(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "principalId": "finance",
            "policyDocument": {
                "Version": "2012-10-17",
                "Statement": [{
                    "Action": "execute-api:Invoke",
                    "Effect": "Allow",
                    "Resource": ["arn:aws:execute-api:us-east-1:123456789012:qsxrty/test/*/*"]
                }]
            },
            "context": { "channel": "finance" }
        })
    );
}

#[tokio::test]
async fn bearer_prefix_is_accepted() {
    let token = sign(SECRET, json!({ "channel": "my_channel" }));
    let (status, body) =
        post_event(router().await, token_event(&format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["principalId"], "my_channel");
}

#[tokio::test]
async fn wrong_secret_is_unauthorized() {
    let token = sign("someone_elses_secret", json!({ "channel": "finance" }));
    let (status, body) = post_event(router().await, token_event(&token)).await;
    assert_unauthorized(status, &body);
}

#[tokio::test]
async fn missing_channel_is_unauthorized() {
    let token = sign(SECRET, json!({ "otherProp": "other prop value" }));
    let (status, body) = post_event(router().await, token_event(&token)).await;
    assert_unauthorized(status, &body);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (status, body) = post_event(
        router().await,
        json!({ "type": "TOKEN", "methodArn": METHOD_ARN }),
    )
    .await;
    assert_unauthorized(status, &body);
}

#[tokio::test]
async fn malformed_method_arn_is_unauthorized() {
    let token = sign(SECRET, json!({ "channel": "finance" }));
    let (status, body) = post_event(
        router().await,
        json!({ "type": "TOKEN", "authorizationToken": token, "methodArn": "garbage" }),
    )
    .await;
    assert_unauthorized(status, &body);
}

#[tokio::test]
async fn colon_in_request_path_is_authorized() {
    let token = sign(SECRET, json!({ "channel": "finance" }));
    let (status, body) = post_event(
        router().await,
        json!({
            "type": "TOKEN",
            "authorizationToken": token,
            "methodArn": "arn:aws:execute-api:us-east-1:123456789012:qsxrty/test/GET/items/urn:isbn:123",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["principalId"], "finance");
    assert_eq!(
        body["policyDocument"]["Statement"][0]["Resource"],
        json!(["arn:aws:execute-api:us-east-1:123456789012:qsxrty/test/*/*"])
    );
}

#[tokio::test]
async fn request_events_are_rejected_as_bad_request() {
    let token = sign(SECRET, json!({ "channel": "finance" }));
    let (status, body) = post_event(
        router().await,
        json!({ "type": "REQUEST", "authorizationToken": token, "methodArn": METHOD_ARN }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn configured_principal_claim_is_used() {
    let config = Config {
        principal_claim: "tenant".into(),
        ..Config::default()
    };
    let token = sign(SECRET, json!({ "tenant": "acme", "channel": "finance" }));
    let (status, body) = post_event(router_with(config).await, token_event(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["principalId"], "acme");
    assert_eq!(body["context"], json!({ "tenant": "acme" }));
}

#[tokio::test]
async fn rules_file_replaces_default_policy() {
    let path = std::env::temp_dir().join(format!("authorizer-rules-{}.json", std::process::id()));
    std::fs::write(
        &path,
        json!([
            { "effect": "Allow", "verb": "GET", "resource": "/pets" },
            { "effect": "Deny", "verb": "*", "resource": "/admin",
              "conditions": { "IpAddress": { "aws:SourceIp": "10.0.0.0/8" } } }
        ])
        .to_string(),
    )
    .unwrap();

    let config = Config {
        policy_rules_path: Some(path.clone()),
        ..Config::default()
    };
    let app = router_with(config).await;
    std::fs::remove_file(&path).ok();

    let token = sign(SECRET, json!({ "channel": "finance" }));
    let (status, body) = post_event(app, token_event(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let statements = body["policyDocument"]["Statement"].as_array().unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0]["Effect"], "Allow");
    assert_eq!(
        statements[0]["Resource"],
        json!(["arn:aws:execute-api:us-east-1:123456789012:qsxrty/test/GET/pets"])
    );
    assert!(statements[0].get("Condition").is_none());
    assert_eq!(statements[1]["Effect"], "Deny");
    assert_eq!(
        statements[1]["Condition"],
        json!({ "IpAddress": { "aws:SourceIp": "10.0.0.0/8" } })
    );
}
