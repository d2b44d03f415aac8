//! The deletion endpoint itself.
//!
//! One route, matched by hand so the contract is explicit:
//!
//! | Method  | Response                                             |
//! |---------|------------------------------------------------------|
//! | OPTIONS | 204 (CORS preflight)                                 |
//! | POST    | 200 on success, 400 bad body or user mismatch,       |
//! |         | 401 missing/invalid token, 500 purge failure         |
//! | other   | 405                                                  |
//!
//! Every response carries permissive CORS headers; the dashboard calls
//! this endpoint cross-origin.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::auth;
use crate::deleter::AccountDeleter;

pub struct AppState {
    pub deleter: Arc<dyn AccountDeleter>,
    pub jwt_secret: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/delete-account", any(delete_account))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct DeleteRequest {
    user_id: String,
}

async fn delete_account(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match method {
        Method::OPTIONS => with_cors(StatusCode::NO_CONTENT.into_response()),
        Method::POST => with_cors(handle_post(&state, &headers, &body).await),
        _ => with_cors(error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed",
        )),
    }
}

async fn handle_post(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Response {
    // Credential first; the body is untrusted until we know who is asking.
    let claims = match auth::bearer_token(headers).and_then(|t| auth::verify(t, &state.jwt_secret))
    {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "Deletion request rejected");
            return error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
        }
    };

    let request: DeleteRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid request body"),
    };

    if request.user_id.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "user_id is required");
    }

    // A valid token only authorizes deleting its own account.
    if claims.sub != request.user_id {
        warn!(sub = %claims.sub, "Token subject does not match requested user");
        return error_response(StatusCode::BAD_REQUEST, "User ID mismatch");
    }

    match state.deleter.delete_account(&request.user_id).await {
        Ok(purge) => {
            info!(user_id = %request.user_id, "Account deleted");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "sales_deleted": purge.sales_deleted,
                    "products_deleted": purge.products_deleted,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(user_id = %request.user_id, error = %e, "Account purge failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Deletion failed")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn with_cors(mut response: Response) -> Response {
    use axum::http::HeaderValue;
    let headers = response.headers_mut();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Authorization, Content-Type"),
    );
    response
}

// =============================================================================
// Unit Tests
// =============================================================================
