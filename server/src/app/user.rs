use std::sync::RwLock;

use ahash::AHashMap;
use tracing::info;

use crate::error::{ServerError, ServerResult};

/// Registered account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    account: String,
    password: String,
    email: String,
}

impl User {
    pub fn new<A, P, E>(account: A, password: P, email: E) -> Self
    where
        A: Into<String>,
        P: Into<String>,
        E: Into<String>,
    {
        Self {
            account: account.into(),
            password: password.into(),
            email: email.into(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn check_password(&self, password: &str) -> bool {
        self.password == password
    }
}

/// In-memory account store keyed by account name
#[derive(Debug)]
pub struct UserRepository {
    users: RwLock<AHashMap<String, User>>,
}

impl UserRepository {
    /// Empty repository
    pub fn new() -> Self {
        Self {
            users: RwLock::new(AHashMap::new()),
        }
    }

    /// Repository holding the demo account `gugu` / `password`
    pub fn seeded() -> Self {
        let mut users = AHashMap::new();
        users.insert(
            "gugu".to_string(),
            User::new("gugu", "password", "gugu@example.com"),
        );
        Self {
            users: RwLock::new(users),
        }
    }

    /// Store a new user; returns `false` when the account is taken
    pub fn save(&self, user: User) -> ServerResult<bool> {
        let mut users = self
            .users
            .write()
            .map_err(|_| ServerError::Handler("user repository lock poisoned".to_string()))?;

        if users.contains_key(user.account()) {
            return Ok(false);
        }
        info!("Registered user {}", user.account());
        users.insert(user.account().to_string(), user);
        Ok(true)
    }

    pub fn find_by_account(&self, account: &str) -> ServerResult<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| ServerError::Handler("user repository lock poisoned".to_string()))?;
        Ok(users.get(account).cloned())
    }
}

impl Default for UserRepository {
    fn default() -> Self {
        Self::new()
    }
}
