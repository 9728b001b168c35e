use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload binding a session to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user ID
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    pub iat: i64, // issued at (unix timestamp)
    pub exp: i64, // expires at (unix timestamp)
}
