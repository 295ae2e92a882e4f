//! User account service.

use crate::error::{ChatError, Result};
use crate::store::ChatStore;
use crate::types::{CreateUserInput, User, UserId};
use std::sync::Arc;
use uuid::Uuid;

/// Account management and login.
pub struct UserService {
    /// Storage collaborator.
    store: Arc<dyn ChatStore>,
}

impl UserService {
    /// Create a service on top of a store.
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self { store }
    }

    /// Register a new user with a freshly minted id.
    pub fn create_user(&self, input: CreateUserInput) -> Result<User> {
        if input.email.is_empty() {
            return Err(ChatError::MissingField("email"));
        }
        if input.password.is_empty() {
            return Err(ChatError::MissingField("password"));
        }
        if input.username.is_empty() {
            return Err(ChatError::MissingField("username"));
        }
        if input.display_name.is_empty() {
            return Err(ChatError::MissingField("displayName"));
        }

        let user = User {
            id: UserId::from(Uuid::new_v4().to_string()),
            email: input.email,
            password: input.password,
            username: input.username,
            display_name: input.display_name,
            profile_picture: None,
        };
        self.store.create_user(&user)?;

        tracing::debug!(user = %user.id, "user created");
        Ok(user)
    }

    /// Fetch a user by id.
    pub fn get_user(&self, id: &UserId) -> Result<User> {
        self.store.get_user(id)
    }

    /// All registered users.
    pub fn get_users(&self) -> Result<Vec<User>> {
        self.store.get_users()
    }

    /// Fetch users by id. Unknown ids are skipped and duplicates collapse
    /// to one, in first-occurrence order.
    pub fn get_users_by_id(&self, ids: &[UserId]) -> Result<Vec<User>> {
        self.store.get_users_by_id(ids)
    }

    /// Replace a stored user record.
    pub fn update_user(&self, user: User) -> Result<User> {
        self.store.update_user(&user)?;
        Ok(user)
    }

    /// Remove a user account.
    pub fn delete_user(&self, id: &UserId) -> Result<()> {
        self.store.delete_user(id)?;
        tracing::debug!(user = %id, "user deleted");
        Ok(())
    }

    /// Check credentials against the stored record.
    ///
    /// Returns the user on a match and `None` on a password mismatch.
    /// An unknown email is an error, not a mismatch.
    pub fn login(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = self.store.get_user_by_email(email)?;

        if user.password == password {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}
