//! User profiles.

use std::sync::Arc;

use jewel_commerce::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{to_fields, Fields};
use crate::{DbError, DocumentStore};

/// Collection holding user profiles, keyed by uid.
pub const USERS: &str = "users";

/// Access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

/// A stored user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

impl UserProfile {
    /// A customer profile.
    pub fn new(uid: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Customer,
            created_at: None,
            last_login: None,
        }
    }

    /// "First Last", or the email when both names are blank.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// User profile access over a document store.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<UserProfile>, DbError> {
        self.store
            .list(USERS)
            .await?
            .iter()
            .map(|doc| doc.deserialize_with_id("uid"))
            .collect()
    }

    pub async fn get_by_id(&self, uid: &str) -> Result<Option<UserProfile>, DbError> {
        match self.store.get(USERS, uid).await? {
            Some(doc) => Ok(Some(doc.deserialize_with_id("uid")?)),
            None => Ok(None),
        }
    }

    /// Create or replace a profile under its uid.
    pub async fn save(&self, profile: &UserProfile) -> Result<(), DbError> {
        let mut fields = to_fields(profile)?;
        fields.remove("uid");
        self.store.set(USERS, profile.uid.as_str(), fields).await
    }

    pub async fn update_role(&self, uid: &str, role: Role) -> Result<(), DbError> {
        let mut patch = Fields::new();
        patch.insert("role".to_string(), Value::String(role.as_str().to_string()));
        self.store.update(USERS, uid, patch).await
    }
}
