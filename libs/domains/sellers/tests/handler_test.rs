//! Handler tests for the sellers domain, run against the in-memory repository.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use axum_helpers::{JwtAuth, JwtConfig, TokenSubject};
use core_accounts::Role;
use core_uploads::{UploadConfig, UploadStore};
use domain_sellers::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    auth: JwtAuth,
}

impl TestApp {
    fn new() -> Self {
        let auth = JwtAuth::new(&JwtConfig::new("this-is-a-valid-secret-with-32-chars!").unwrap());
        let service = SellerService::new(
            InMemorySellerRepository::new(),
            auth.clone(),
            UploadStore::new(&UploadConfig::new("uploads", "http://localhost:8080")),
        );
        Self {
            router: handlers::router(service, auth.clone()),
            auth,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    fn staff_token(&self) -> String {
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

    async fn register(&self) -> String {
        let response = self
            .send(json_request("POST", "/register", None, registration()))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["data"]["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    async fn activate(&self, token: &str) -> Response {
        self.send(json_request(
            "POST",
            "/activation",
            None,
            json!({ "activationToken": token }),
        ))
        .await
    }

    async fn login(&self) -> Response {
        self.send(json_request(
            "POST",
            "/login",
            None,
            json!({ "email": "karim@shop.com", "password": "long-enough-pass" }),
        ))
        .await
    }

    async fn active_seller(&self) -> (String, String) {
        let activation = self.register().await;
        assert_eq!(self.activate(&activation).await.status(), StatusCode::OK);

        let token = json_body(self.login().await).await["data"]["token"]
            .as_str()
            .unwrap()
            .to_string();
        let response = self.send(authed("GET", "/getSellerProfile", &token)).await;
        let id = json_body(response).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();
        (id, token)
    }
}

fn registration() -> Value {
    json!({
        "firstName": "Karim",
        "lastName": "Nabil",
        "storeName": "Nile Crafts",
        "email": "karim@shop.com",
        "password": "long-enough-pass",
        "mobilePhone": "01222222222"
    })
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
async fn test_register_then_activate_then_login() {
    let app = TestApp::new();
    let activation = app.register().await;

    let response = app.login().await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json_body(response).await["message"]["en"],
        "Please activate your account first"
    );

    let response = app.activate(&activation).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["message"]["en"],
        "Account activated successfully"
    );

    let response = app.activate(&activation).await;
    assert_eq!(
        json_body(response).await["message"]["en"],
        "Account is already activated"
    );

    assert_eq!(app.login().await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_activation_requires_token() {
    let app = TestApp::new();

    let response = app
        .send(json_request("POST", "/activation", None, json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["status"], "FAIL");

    let response = app.activate("garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["status"], "ERROR");

    // A staff token passes the signature check but not the seller gate
    let response = app.activate(&app.staff_token()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_duplicate_phone_is_conflict() {
    let app = TestApp::new();
    app.register().await;

    let mut body = registration();
    body["email"] = json!("other@shop.com");
    let response = app
        .send(json_request("POST", "/register", None, body))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["message"]["en"],
        "Mobile phone already exists"
    );
}

#[tokio::test]
async fn test_get_by_id_is_public() {
    let app = TestApp::new();
    let (id, _) = app.active_seller().await;

    let request = Request::builder()
        .uri(format!("/{id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["storeName"], "Nile Crafts");
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_edit_reports_flat_field_errors() {
    let app = TestApp::new();
    let (id, token) = app.active_seller().await;

    let response = app
        .send(json_request(
            "PUT",
            &format!("/{id}"),
            Some(&token),
            json!({ "storeName": "ab" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["errors"][0]["field"], "storeName");

    let response = app
        .send(json_request(
            "PUT",
            &format!("/{id}"),
            Some(&token),
            json!({ "storeName": "Delta Goods" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["storeName"], "Delta Goods");
}

#[tokio::test]
async fn test_list_and_delete_require_staff() {
    let app = TestApp::new();
    let (id, token) = app.active_seller().await;

    let response = app.send(authed("GET", "/", &token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.send(authed("DELETE", &format!("/{id}"), &token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let staff = app.staff_token();
    let response = app.send(authed("GET", "/", &staff)).await;
    assert_eq!(json_body(response).await["data"]["total"], 1);

    let response = app.send(authed("DELETE", &format!("/{id}"), &staff)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["message"]["en"],
        "Seller deleted successfully"
    );
}
