use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::PublicUser;

/// Request body for register and login. Fields are optional so that a missing
/// field is reported as a validation issue rather than a deserialization failure.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub success: bool,
    pub data: PublicUser,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub data: LoginData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    pub success: bool,
}

/// Error body produced by `AppError`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
}
