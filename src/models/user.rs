use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The signed-in user as reported by the backend's auth service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}
