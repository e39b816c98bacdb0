use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use partstock_auth::AuthError;

use crate::app::dto;
use crate::app::errors;
use crate::app::services::AppServices;

const BAD_CREDENTIALS: &str = "Invalid username or password";

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.auth.login(&body.username, &body.password, Utc::now()) {
        Ok((user, issued)) => Json(dto::LoginResponse {
            token: issued.token,
            username: user.username,
            message: "Login successful",
            expires_at: issued.expires_at,
        })
        .into_response(),
        Err(AuthError::BadCredentials) => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": BAD_CREDENTIALS })),
        )
            .into_response(),
        Err(AuthError::Repository(e)) => errors::repository_error_to_response(e),
        Err(e) => {
            tracing::error!(error = %e, "login failed");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "auth_error", e.to_string())
        }
    }
}
