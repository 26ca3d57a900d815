use super::jwt::{JwtAuth, JwtClaims};
use crate::errors::{AppError, messages};
use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use core_accounts::Actor;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

/// Largest JSON body buffered while looking for `activationToken`.
const MAX_BUFFERED_BODY: usize = 2 * 1024 * 1024;

/// Verified caller attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentIdentity {
    pub claims: JwtClaims,
    /// The raw token as presented
    pub token: String,
}

impl CurrentIdentity {
    /// The caller's id as stored in the credential store.
    pub fn id(&self) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(&self.claims.sub)
            .map_err(|_| AppError::InvalidToken(messages::INVALID_TOKEN))
    }

    /// Id and role, for ownership checks in services.
    pub fn actor(&self) -> Result<Actor, AppError> {
        Ok(Actor::new(self.id()?, self.claims.role))
    }
}

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentIdentity>()
            .cloned()
            .ok_or(AppError::Unauthorized(messages::TOKEN_REQUIRED))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenBody {
    activation_token: Option<String>,
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

fn header_token(headers: &HeaderMap) -> Option<String> {
    let custom = headers
        .get("token")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let bearer = || {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|auth| auth.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    };

    custom.or_else(bearer).map(str::to_string)
}

/// Reads `activationToken` from a JSON body and puts the body back untouched.
async fn body_token(request: Request) -> Result<(Request, Option<String>), AppError> {
    if !is_json(request.headers()) {
        return Ok((request, None));
    }

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BUFFERED_BODY)
        .await
        .map_err(|_| AppError::BadRequest(messages::INVALID_BODY))?;

    let token = serde_json::from_slice::<TokenBody>(&bytes)
        .ok()
        .and_then(|b| b.activation_token)
        .filter(|t| !t.trim().is_empty());

    Ok((Request::from_parts(parts, Body::from(bytes)), token))
}

/// Token gate.
///
/// Looks for a token in the `activationToken` JSON body field, then the `token`
/// header, then `Authorization: Bearer`. Missing token is a 401 `FAIL`; a token
/// that fails signature or expiry checks is a 401 `ERROR`. On success the
/// decoded claims and the raw token are attached as [`CurrentIdentity`].
///
/// ```ignore
/// let protected = Router::new()
///     .route("/profile", get(profile))
///     .route_layer(axum::middleware::from_fn_with_state(auth, require_auth));
/// ```
pub async fn require_auth(
    State(auth): State<JwtAuth>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut request, from_body) = body_token(request).await?;

    let Some(token) = from_body.or_else(|| header_token(request.headers())) else {
        tracing::debug!("No token in body, token header or Authorization header");
        return Err(AppError::Unauthorized(messages::TOKEN_REQUIRED));
    };

    let claims = auth.verify(&token).inspect_err(|e| {
        tracing::debug!("JWT verification failed: {}", e);
    })?;

    tracing::debug!(sub = %claims.sub, role = %claims.role, "Request authenticated");
    request
        .extensions_mut()
        .insert(CurrentIdentity { claims, token });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, TokenSubject};
    use axum::{Router, http::StatusCode, middleware::from_fn_with_state, routing::post};
    use core_accounts::Role;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("this-is-a-valid-secret-with-32-chars!").unwrap())
    }

    fn token(auth: &JwtAuth, id: &str) -> String {
        auth.issue(TokenSubject {
            id,
            name: "Sara Nabil",
            email: "sara@example.com",
            phone: "01111111111",
            role: Role::Seller,
        })
        .unwrap()
    }

    async fn whoami(identity: CurrentIdentity, body: String) -> String {
        format!("{}|{}", identity.claims.sub, body)
    }

    fn app(auth: JwtAuth) -> Router {
        Router::new()
            .route("/", post(whoami))
            .route_layer(from_fn_with_state(auth, require_auth))
    }

    async fn text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_is_401_fail() {
        let response = app(auth())
            .oneshot(Request::post("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(text(response).await.contains("\"FAIL\""));
    }

    #[tokio::test]
    async fn test_invalid_token_is_401_error() {
        let response = app(auth())
            .oneshot(
                Request::post("/")
                    .header("authorization", "Bearer garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(text(response).await.contains("\"ERROR\""));
    }

    #[tokio::test]
    async fn test_bearer_header() {
        let auth = auth();
        let token = token(&auth, "a1");
        let response = app(auth)
            .oneshot(
                Request::post("/")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, "a1|");
    }

    #[tokio::test]
    async fn test_token_header_beats_bearer() {
        let auth = auth();
        let custom = token(&auth, "from-token-header");
        let bearer = token(&auth, "from-bearer");
        let response = app(auth)
            .oneshot(
                Request::post("/")
                    .header("token", custom)
                    .header("authorization", format!("Bearer {bearer}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(text(response).await, "from-token-header|");
    }

    #[tokio::test]
    async fn test_body_token_wins_and_body_is_preserved() {
        let auth = auth();
        let in_body = token(&auth, "from-body");
        let in_header = token(&auth, "from-header");
        let body = format!(r#"{{"activationToken":"{in_body}"}}"#);

        let response = app(auth)
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .header("token", in_header)
                    .body(Body::from(body.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, format!("from-body|{body}"));
    }

    #[test]
    fn test_identity_id_parses_object_id() {
        let id = ObjectId::new();
        let auth = auth();
        let claims = auth.verify(&token(&auth, &id.to_hex())).unwrap();
        let identity = CurrentIdentity {
            claims,
            token: String::new(),
        };
        assert_eq!(identity.id().unwrap(), id);
    }
}
