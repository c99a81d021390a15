use serde::{Deserialize, Serialize};

/// Role of the signed-in user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Acheteur,
    Vendeur,
    Agent,
    Entreprise,
}

/// Identity of the signed-in user, handed explicitly to the operations that
/// need it. Authentication itself happens upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user_id: String,
    pub role: UserRole,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl UserSession {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            display_name: None,
        }
    }
}
