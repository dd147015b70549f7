use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewUser, User},
    helpers::{hash_password, verify_password},
    market_api::account_objects::NewUserRequest,
    traits::{AuthApiError, AuthManagement},
};

/// `AuthApi` registers users and checks their credentials. Token issuance is left to the caller.
pub struct AuthApi<B> {
    db: B,
}

impl<B> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi")
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Registers a new user. The password is stored as an argon2 hash.
    pub async fn sign_up(&self, request: NewUserRequest) -> Result<User, AuthApiError> {
        let username = request.username.trim().to_string();
        if username.is_empty() {
            return Err(AuthApiError::InvalidSignUp("Username cannot be empty".into()));
        }
        if request.password.reveal().is_empty() {
            return Err(AuthApiError::InvalidSignUp("Password cannot be empty".into()));
        }
        let password_hash = hash_password(request.password.reveal())?;
        let user = NewUser {
            username,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
        };
        let user = self.db.insert_user(user).await?;
        info!("🔑️ New user {} signed up with id {}", user.username, user.id);
        Ok(user)
    }

    /// Checks the user's password. Returns the user if it matches.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<User, AuthApiError> {
        let hash = self
            .db
            .fetch_password_hash(username)
            .await?
            .ok_or_else(|| AuthApiError::UsernameNotFound(username.to_string()))?;
        if !verify_password(password, &hash) {
            debug!("🔑️ Wrong password supplied for {username}");
            return Err(AuthApiError::InvalidPassword);
        }
        let user = self
            .db
            .fetch_user_by_username(username)
            .await?
            .ok_or_else(|| AuthApiError::UsernameNotFound(username.to_string()))?;
        debug!("🔑️ {username} signed in");
        Ok(user)
    }
}
