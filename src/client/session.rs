use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    client::storage::Storage,
    models::{Product, Role, User},
};

pub const AUTH_KEY: &str = "auth";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: Option<User>,
    #[serde(default)]
    pub token: String,
}

/// The signed-in user and token, mirrored to storage under `auth`.
pub struct AuthState {
    storage: Arc<dyn Storage>,
    session: AuthSession,
}

impl AuthState {
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let session = match storage.get_item(AUTH_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "stored session is unreadable");
                AuthSession::default()
            }),
            Ok(None) => AuthSession::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored session");
                AuthSession::default()
            }
        };
        Self { storage, session }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        Some(self.session.token.as_str()).filter(|t| !t.is_empty())
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.user.is_some() && self.token().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.session
            .user
            .as_ref()
            .is_some_and(|user| user.role == Role::Admin)
    }

    pub fn sign_in(&mut self, user: User, token: String) {
        self.session = AuthSession {
            user: Some(user),
            token,
        };
        self.persist();
    }

    /// Keeps the token; used after a profile update.
    pub fn replace_user(&mut self, user: User) {
        self.session.user = Some(user);
        self.persist();
    }

    pub fn sign_out(&mut self) {
        self.session = AuthSession::default();
        if let Err(err) = self.storage.remove_item(AUTH_KEY) {
            tracing::warn!(error = %err, "failed to remove stored session");
        }
    }

    fn persist(&self) {
        match serde_json::to_string(&self.session) {
            Ok(raw) => {
                if let Err(err) = self.storage.set_item(AUTH_KEY, &raw) {
                    tracing::warn!(error = %err, "failed to persist session");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to encode session"),
        }
    }
}

/// The search box and its last results. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub keyword: String,
    pub results: Vec<Product>,
}

impl SearchState {
    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
    }

    pub fn set_results(&mut self, results: Vec<Product>) {
        self.results = results;
    }
}
