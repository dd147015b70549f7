use fx_common::Secret;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Deal, Offer, User},
    market_api::query_objects::Page,
};

/// A user, the offers they have listed and the deals they have bought.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub offers: Page<Offer>,
    pub deals: Page<Deal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUserRequest {
    pub username: String,
    pub password: Secret<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl NewUserRequest {
    pub fn new<S: Into<String>>(username: S, password: S) -> Self {
        Self {
            username: username.into(),
            password: Secret::new(password.into()),
            first_name: String::default(),
            last_name: String::default(),
            email: String::default(),
        }
    }

    pub fn with_name<S: Into<String>>(mut self, first_name: S, last_name: S) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = email.into();
        self
    }
}
