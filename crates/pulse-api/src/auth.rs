//! # Authentication Middleware
//!
//! Resolves the session JWT from the `Authorization: Bearer` header (or
//! a `token` cookie as a fallback for browser clients), verifies it,
//! loads the account, and injects a [`CurrentUser`] into request
//! extensions. Unknown accounts and deactivated accounts are both
//! rejected with 401 before any handler runs.
//!
//! Public endpoints (register, login, password reset, health, openapi)
//! are mounted outside this middleware.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use pulse_auth::TokenKeys;
use pulse_core::{Actor, User};

use crate::error::{AppError, ErrorBody};
use crate::state::Store;

/// What the middleware needs to resolve a token, injected as an
/// `Extension` when the router is assembled.
#[derive(Clone)]
pub struct AuthContext {
    /// Verification keys for session tokens.
    pub keys: Arc<TokenKeys>,
    /// Account store, for the is_active check.
    pub users: Store<User>,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext").field("users", &self.users.len()).finish_non_exhaustive()
    }
}

/// The authenticated account a request runs as.
///
/// Handlers extract it via `FromRequestParts`; the middleware
/// guarantees it is present on every route mounted behind it.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// The policy-layer view of this account.
    pub fn actor(&self) -> Actor {
        Actor { id: self.0.id, role: self.0.role }
    }
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authorized to access this route".into()))
    }
}

/// Pull the session token out of the request: `Authorization: Bearer`
/// wins, then a `token` cookie.
fn token_from_request(request: &Request) -> Option<String> {
    if let Some(value) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    request
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(str::trim)
                .find_map(|pair| pair.strip_prefix("token="))
                .map(str::to_string)
        })
}

/// Verify the session token and load the account it names.
///
/// Every failure is a 401 with the envelope body; the only message that
/// distinguishes itself is the deactivated-account one, which reveals
/// nothing the caller didn't already prove by presenting a valid token.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(ctx) = request.extensions().get::<AuthContext>().cloned() else {
        tracing::error!("auth middleware mounted without AuthContext extension");
        return unauthorized_response("Not authorized to access this route");
    };

    let Some(token) = token_from_request(&request) else {
        return unauthorized_response("Not authorized to access this route");
    };

    let claims = match ctx.keys.verify(&token) {
        Ok(claims) => claims,
        Err(_) => {
            tracing::debug!("authentication failed: token did not verify");
            return unauthorized_response("Not authorized to access this route");
        }
    };

    let Some(user) = ctx.users.get(&claims.sub) else {
        tracing::debug!(user_id = %claims.sub, "authentication failed: unknown account");
        return unauthorized_response("Not authorized to access this route");
    };

    if !user.is_active {
        tracing::debug!(user_id = %user.id, "authentication failed: deactivated account");
        return unauthorized_response("User account is deactivated");
    }

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

fn unauthorized_response(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorBody::new(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use pulse_core::Role;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn sample_user(id: Uuid, active: bool) -> User {
        let now = Utc::now();
        User {
            id,
            username: "omar.f".to_string(),
            email: "omar@example.edu".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role: Role::Student,
            first_name: "Omar".to_string(),
            last_name: "Farooq".to_string(),
            student_id: Some("FA22-BCS-017".to_string()),
            year_of_study: Some(2),
            department: None,
            is_active: active,
            reset_token_hash: None,
            reset_token_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_app(users: Store<User>, keys: Arc<TokenKeys>) -> Router {
        let ctx = AuthContext { keys, users };
        Router::new()
            .route(
                "/whoami",
                get(|user: CurrentUser| async move { user.0.username }),
            )
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(ctx))
    }

    fn keys() -> Arc<TokenKeys> {
        Arc::new(TokenKeys::new(b"middleware-test-secret"))
    }

    #[tokio::test]
    async fn valid_bearer_token_resolves_user() {
        let keys = keys();
        let users = Store::new();
        let id = Uuid::new_v4();
        users.insert(id, sample_user(id, true));
        let token = keys.issue(id, Role::Student, Utc::now()).unwrap();
        let app = test_app(users, keys);

        let request = HttpRequest::builder()
            .uri("/whoami")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"omar.f");
    }

    #[tokio::test]
    async fn cookie_token_is_accepted() {
        let keys = keys();
        let users = Store::new();
        let id = Uuid::new_v4();
        users.insert(id, sample_user(id, true));
        let token = keys.issue(id, Role::Student, Utc::now()).unwrap();
        let app = test_app(users, keys);

        let request = HttpRequest::builder()
            .uri("/whoami")
            .header("Cookie", format!("theme=dark; token={token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_token_is_401() {
        let app = test_app(Store::new(), keys());
        let request = HttpRequest::builder().uri("/whoami").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["success"], false);
    }

    #[tokio::test]
    async fn garbage_token_is_401() {
        let users = Store::new();
        let id = Uuid::new_v4();
        users.insert(id, sample_user(id, true));
        let app = test_app(users, keys());

        let request = HttpRequest::builder()
            .uri("/whoami")
            .header("Authorization", "Bearer not.a.jwt")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_for_deleted_account_is_401() {
        let keys = keys();
        let token = keys.issue(Uuid::new_v4(), Role::Student, Utc::now()).unwrap();
        let app = test_app(Store::new(), keys);

        let request = HttpRequest::builder()
            .uri("/whoami")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn deactivated_account_is_401_with_message() {
        let keys = keys();
        let users = Store::new();
        let id = Uuid::new_v4();
        users.insert(id, sample_user(id, false));
        let token = keys.issue(id, Role::Student, Utc::now()).unwrap();
        let app = test_app(users, keys);

        let request = HttpRequest::builder()
            .uri("/whoami")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["message"], "User account is deactivated");
    }
}
