//! Handler tests for the admins domain, run against the in-memory repository.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use axum_helpers::{JwtAuth, JwtConfig};
use core_uploads::{UploadConfig, UploadStore};
use domain_admins::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

struct TestApp {
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let auth = JwtAuth::new(&JwtConfig::new(SECRET).unwrap());
        let uploads = UploadStore::new(&UploadConfig::new("uploads", "http://localhost:8080"));
        let service = AdminService::new(InMemoryAdminRepository::new(), auth.clone(), uploads);
        service
            .ensure_super_admin(SuperAdminSeed {
                email: "root@souq.test".to_string(),
                password: "root-password".to_string(),
                mobile_phone: "01099999999".to_string(),
            })
            .await
            .unwrap();

        Self {
            router: handlers::router(service, auth),
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.send(json_request("POST", uri, token, body)).await
    }

    async fn register(&self, n: u8) -> String {
        let response = self.post("/register", None, registration(n)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["data"]["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    async fn super_token(&self) -> String {
        let response = self
            .post(
                "/login",
                None,
                json!({ "email": "root@souq.test", "password": "root-password" }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["data"]["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    async fn profile_id(&self, token: &str) -> String {
        let response = self.send(get("/getProfile", token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

fn registration(n: u8) -> Value {
    json!({
        "firstName": "Mona",
        "lastName": "Adel",
        "email": format!("mona{n}@souq.test"),
        "password": "long-enough-pass",
        "mobilePhone": format!("0100000000{n}")
    })
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header("token", token)
        .body(Body::empty())
        .unwrap()
}

fn bare(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("token", token)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_then_duplicate_is_conflict() {
    let app = TestApp::new().await;
    app.register(1).await;

    let response = app.post("/register", None, registration(1)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["status"], "FAIL");
    assert_eq!(body["message"]["en"], "Admin already exists");
}

#[tokio::test]
async fn test_register_validation_is_field_level() {
    let app = TestApp::new().await;
    let mut input = registration(1);
    input["firstName"] = json!("Mo");
    input["mobilePhone"] = json!("12");

    let response = app.post("/register", None, input).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["firstName", "mobilePhone"]);
}

#[tokio::test]
async fn test_login_success_and_wrong_password() {
    let app = TestApp::new().await;
    app.register(1).await;

    let ok = app
        .post(
            "/login",
            None,
            json!({ "email": "mona1@souq.test", "password": "long-enough-pass" }),
        )
        .await;
    assert_eq!(ok.status(), StatusCode::OK);
    let body = json_body(ok).await;
    assert_eq!(body["message"]["en"], "logged in successfully");
    let token = body["data"]["token"].as_str().unwrap();
    let claims = JwtAuth::new(&JwtConfig::new(SECRET).unwrap())
        .verify(token)
        .unwrap();
    assert_eq!(claims.email, "mona1@souq.test");

    let wrong = app
        .post(
            "/login",
            None,
            json!({ "email": "mona1@souq.test", "password": "not-the-password" }),
        )
        .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = TestApp::new().await;
    let response = app
        .send(Request::get("/getProfile").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["status"], "FAIL");

    let response = app.send(get("/getProfile", "garbage")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["status"], "ERROR");
}

#[tokio::test]
async fn test_super_admin_routes_reject_plain_admins() {
    let app = TestApp::new().await;
    let token = app.register(1).await;

    let response = app.send(get("/all-admins", &token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["status"], "FAIL");
}

#[tokio::test]
async fn test_super_admin_cannot_be_deleted_or_blocked() {
    let app = TestApp::new().await;
    let token = app.super_token().await;
    let id = app.profile_id(&token).await;

    let response = app.send(bare("DELETE", &format!("/{id}"), &token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(bare("PUT", &format!("/blockAdmin/{id}"), &token))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_block_toggles_and_delete() {
    let app = TestApp::new().await;
    let admin_token = app.register(1).await;
    let id = app.profile_id(&admin_token).await;
    let token = app.super_token().await;

    let response = app
        .send(bare("PUT", &format!("/blockAdmin/{id}"), &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["isActive"], false);

    let login = app
        .post(
            "/login",
            None,
            json!({ "email": "mona1@souq.test", "password": "long-enough-pass" }),
        )
        .await;
    assert_eq!(login.status(), StatusCode::FORBIDDEN);

    let response = app.send(bare("DELETE", &format!("/{id}"), &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["message"]["en"],
        "Admin deleted successfully"
    );

    let response = app.send(get(&format!("/{id}"), &token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_conflict_leaves_target_unchanged() {
    let app = TestApp::new().await;
    app.register(1).await;
    let token = app.register(2).await;
    let id = app.profile_id(&token).await;

    let response = app
        .send(json_request(
            "PUT",
            &format!("/{id}"),
            Some(&token),
            json!({ "firstName": "Changed", "mobilePhone": "01000000001" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.send(get(&format!("/{id}"), &token)).await;
    assert_eq!(json_body(response).await["data"]["firstName"], "Mona");
}

#[tokio::test]
async fn test_edit_own_profile() {
    let app = TestApp::new().await;
    let token = app.register(1).await;
    let id = app.profile_id(&token).await;

    let response = app
        .send(json_request(
            "PUT",
            &format!("/{id}"),
            Some(&token),
            json!({ "address": "12 Tahrir Square" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["address"], "12 Tahrir Square");
    assert_eq!(body["message"]["en"], "Profile updated successfully");
}

#[tokio::test]
async fn test_add_and_list_admins_paginates() {
    let app = TestApp::new().await;
    let token = app.super_token().await;

    for n in 1..=5 {
        let response = app.post("/all-admins", Some(&token), registration(n)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.send(get("/all-admins?page=3&limit=2", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = &json_body(response).await["data"];
    assert_eq!(data["total"], 5);
    assert_eq!(data["totalPages"], 3);
    assert_eq!(data["currentPage"], 3);
    assert_eq!(data["items"].as_array().unwrap().len(), 1);

    let response = app.send(get("/all-admins?search=mona3", &token)).await;
    let data = &json_body(response).await["data"];
    assert_eq!(data["total"], 1);
    assert_eq!(data["items"][0]["email"], "mona3@souq.test");
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = TestApp::new().await;
    let token = app.super_token().await;
    let response = app.send(get("/not-an-id", &token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
