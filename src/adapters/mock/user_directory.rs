use crate::domain::value_objects::UserId;
use crate::ports::user_directory::{Result, User, UserDirectory as UserDirectoryTrait};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// In-memory implementation of UserDirectory
///
/// Supports stateful testing by storing user snapshots.
pub struct UserDirectory {
    users: Mutex<HashMap<UserId, User>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Register a user and return its id
    pub fn add_user(&self, name: &str) -> UserId {
        let id = UserId::new();
        self.insert(User {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        });
        id
    }

    /// Register a fully specified user
    pub fn insert(&self, user: User) {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user.id, user);
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectoryTrait for UserDirectory {
    async fn exists(&self, user_id: UserId) -> Result<bool> {
        let users = self.users.lock().map_err(|e| e.to_string())?;
        Ok(users.contains_key(&user_id))
    }

    async fn get(&self, user_id: UserId) -> Result<Option<User>> {
        let users = self.users.lock().map_err(|e| e.to_string())?;
        Ok(users.get(&user_id).cloned())
    }
}
