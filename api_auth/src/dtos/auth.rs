use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: uuid::Uuid,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// The forgot-password endpoint must answer identically whether or not the
/// email exists, so the response body is a fixed constant.
pub const FORGOT_PASSWORD_RESPONSE: &str =
    "If an account exists for that email, a reset link has been sent";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
