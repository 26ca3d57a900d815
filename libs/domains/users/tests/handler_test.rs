//! Handler tests for the users domain, run against the in-memory repository
//! with a recording email provider.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use axum_helpers::{JwtAuth, JwtConfig, TokenSubject};
use core_accounts::Role;
use core_uploads::{UploadConfig, UploadStore};
use domain_notifications::{NotificationService, RecordingEmailProvider};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    auth: JwtAuth,
    outbox: Arc<RecordingEmailProvider>,
}

impl TestApp {
    fn new() -> Self {
        let auth = JwtAuth::new(&JwtConfig::new("this-is-a-valid-secret-with-32-chars!").unwrap());
        let outbox = Arc::new(RecordingEmailProvider::new());
        let service = UserService::new(
            InMemoryUserRepository::new(),
            auth.clone(),
            UploadStore::new(&UploadConfig::new("uploads", "http://localhost:8080")),
            NotificationService::new(outbox.clone()).unwrap(),
        );

        Self {
            router: handlers::router(service, auth.clone()),
            auth,
            outbox,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post(&self, uri: &str, body: Value) -> Response {
        self.send(json_request("POST", uri, None, body)).await
    }

    /// A staff token; the gate only checks the signature and role claim
    fn admin_token(&self) -> String {
        self.auth
            .issue(TokenSubject {
                id: "665f1c2ab7e4a90d3c8f0a11",
                name: "Mona Adel",
                email: "mona@souq.test",
                phone: "01000000000",
                role: Role::Admin,
            })
            .unwrap()
    }

    /// Code from the last email sent to `email`
    async fn emailed_code(&self, email: &str) -> String {
        let mail = self.outbox.last_to(email).await.unwrap();
        mail.text_body
            .split(|c: char| !c.is_ascii_digit())
            .find(|part| part.len() == 4)
            .unwrap()
            .to_string()
    }

    async fn register_verified(&self) -> (String, String) {
        let response = self.post("/register", registration()).await;
        let id = json_body(response).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();
        let code = self.emailed_code("a@x.com").await;
        let response = self
            .post("/verify", json!({ "email": "a@x.com", "code": code }))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = self.post("/login", credentials()).await;
        let token = json_body(response).await["data"]["token"]
            .as_str()
            .unwrap()
            .to_string();
        (id, token)
    }
}

fn registration() -> Value {
    json!({
        "firstName": "Hana",
        "lastName": "Fathy",
        "email": "a@x.com",
        "password": "long-enough-pass",
        "mobilePhone": "0100000000"
    })
}

fn credentials() -> Value {
    json!({ "email": "a@x.com", "password": "long-enough-pass" })
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("token", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_twice_is_conflict() {
    let app = TestApp::new();

    let response = app.post("/register", registration()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["status"], "SUCCESS");
    assert!(body["message"]["ar"].as_str().is_some());
    assert!(body["message"]["en"].as_str().is_some());
    assert_eq!(body["data"]["status"], "NOTVERIFIED");
    assert!(body["data"].get("password").is_none());

    let response = app.post("/register", registration()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["status"], "FAIL");
    assert_eq!(body["message"]["en"], "Email already exists");
}

#[tokio::test]
async fn test_unverified_login_is_forbidden() {
    let app = TestApp::new();
    app.post("/register", registration()).await;

    let response = app.post("/login", credentials()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_verify_flow() {
    let app = TestApp::new();
    app.post("/register", registration()).await;

    let response = app.post("/verify", json!({ "email": "a@x.com" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["message"]["en"],
        "Email and verification code are required"
    );

    let response = app
        .post("/verify", json!({ "email": "nobody@x.com", "code": "1234" }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let code = app.emailed_code("a@x.com").await;
    let wrong = if code == "1111" { "2222" } else { "1111" };
    let response = app
        .post("/verify", json!({ "email": "a@x.com", "code": wrong }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post("/verify", json!({ "email": "a@x.com", "code": code }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["message"]["en"],
        "Account verified successfully"
    );

    let response = app
        .post("/verify", json!({ "email": "a@x.com", "code": code }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["message"]["en"],
        "Account is already verified"
    );

    let response = app.post("/login", credentials()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_resend_verification() {
    let app = TestApp::new();
    app.post("/register", registration()).await;

    let response = app
        .post("/resendVerification", json!({ "email": "a@x.com" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.outbox.sent().await.len(), 2);
}

#[tokio::test]
async fn test_profile_and_self_edit() {
    let app = TestApp::new();
    let (id, token) = app.register_verified().await;

    let response = app.send(authed("GET", "/getUserProfile", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["id"], id);

    let response = app
        .send(json_request(
            "PUT",
            &format!("/{id}"),
            Some(&token),
            json!({ "newPassword": "another-long-pass" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["message"]["en"],
        "Please enter your current password"
    );

    let response = app
        .send(json_request(
            "PUT",
            &format!("/{id}"),
            Some(&token),
            json!({ "lastName": "Samir" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["lastName"], "Samir");
}

#[tokio::test]
async fn test_list_requires_staff() {
    let app = TestApp::new();
    let (_, user_token) = app.register_verified().await;

    let response = app.send(authed("GET", "/", &user_token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.send(authed("GET", "/", &app.admin_token())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["total"], 1);
}

#[tokio::test]
async fn test_block_then_unblock() {
    let app = TestApp::new();
    let (id, _) = app.register_verified().await;
    let admin = app.admin_token();

    let response = app
        .send(json_request(
            "PUT",
            &format!("/blockUser/{id}"),
            Some(&admin),
            json!({ "reason": "chargebacks" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = &json_body(response).await["data"];
    assert_eq!(data["status"], "BLOCKED");
    assert_eq!(data["blockReason"], "chargebacks");

    let response = app.post("/login", credentials()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(json_request(
            "PUT",
            &format!("/blockUser/{id}"),
            Some(&admin),
            json!({}),
        ))
        .await;
    assert_eq!(json_body(response).await["data"]["status"], "VERIFIED");
}

#[tokio::test]
async fn test_delete_returns_refreshed_page() {
    let app = TestApp::new();
    let (id, _) = app.register_verified().await;

    let response = app
        .send(authed("DELETE", &format!("/{id}"), &app.admin_token()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"]["en"], "User deleted successfully");
    assert_eq!(body["data"]["total"], 0);

    let response = app
        .send(authed("GET", &format!("/{id}"), &app.admin_token()))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
