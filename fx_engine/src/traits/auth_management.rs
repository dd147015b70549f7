use crate::{
    db_types::{NewUser, User},
    traits::AuthApiError,
};

/// Storage for user credentials.
#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    /// Stores a new user. Returns [`AuthApiError::UsernameTaken`] if the username is already registered.
    async fn insert_user(&self, user: NewUser) -> Result<User, AuthApiError>;

    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, AuthApiError>;

    /// Returns the stored argon2 password hash for the user, or `None` if the username is not registered.
    async fn fetch_password_hash(&self, username: &str) -> Result<Option<String>, AuthApiError>;
}
