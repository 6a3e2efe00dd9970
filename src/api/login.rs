//! Dashboard login endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::errors::AppError;
use crate::models::LoginRequest;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
}

/// POST /api/login - Check the admin password.
///
/// With no password configured the check is disabled (dev mode), matching
/// the admin API middleware.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    match &state.config.admin_password {
        None => Ok(Json(LoginResponse { success: true })),
        Some(expected) if auth::constant_time_compare(&request.password, expected) => {
            Ok(Json(LoginResponse { success: true }))
        }
        Some(_) => Err(AppError::Unauthorized("Invalid password".to_string())),
    }
}
