use lambda_http::{http::StatusCode, Body, Request, Response};

use festiva_atoms::users::model::ROLE_ADMIN;

/// Authenticated actor context as delivered by the gateway authorizer.
/// The role field is trusted verbatim; authorization beyond the admin gate
/// lives with the identity collaborator and store-side access rules.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub role: String,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Extract the actor identity the gateway authorizer attached to the
/// request. Returns a ready 401 response when the headers are missing.
pub fn authenticate_request(event: &Request) -> Result<AuthContext, Response<Body>> {
    let header = |name: &str| {
        event
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    };

    match (header("x-user-id"), header("x-user-role")) {
        (Some(user_id), Some(role)) => Ok(AuthContext { user_id, role }),
        _ => Err(unauthorized()),
    }
}

/// Admin gate for the booking-management routes.
pub fn require_admin(ctx: &AuthContext) -> Result<(), Response<Body>> {
    if ctx.is_admin() {
        Ok(())
    } else {
        tracing::warn!("Non-admin actor {} hit an admin route", ctx.user_id);
        Err(forbidden())
    }
}

fn unauthorized() -> Response<Body> {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(
            serde_json::json!({"error": "Missing authentication context"})
                .to_string()
                .into(),
        )
        .unwrap_or_default()
}

fn forbidden() -> Response<Body> {
    Response::builder()
        .status(StatusCode::FORBIDDEN)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(
            serde_json::json!({"error": "Admin role required"})
                .to_string()
                .into(),
        )
        .unwrap_or_default()
}
