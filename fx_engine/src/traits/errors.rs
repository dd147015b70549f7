use fx_common::FixedPoint;
use thiserror::Error;

/// The broad class of a [`MarketplaceError`]. Callers (like the HTTP server) use this to decide how to present an
/// error without having to match on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    InvalidOperation,
    Conflict,
    Forbidden,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketplaceError {
    #[error("Currency {0} does not exist")]
    CurrencyNotFound(i64),
    #[error("Offer {0} does not exist")]
    OfferNotFound(i64),
    #[error("Deal {0} does not exist")]
    DealNotFound(i64),
    #[error("User {0} does not exist")]
    UserNotFound(i64),
    #[error("Offer {0} is not active")]
    OfferNotActive(i64),
    #[error("You cannot make a deal on your own offer")]
    SelfDeal,
    #[error("The offer only has {remaining} left, but {requested} was requested")]
    InsufficientOfferAmount { requested: FixedPoint, remaining: FixedPoint },
    #[error("Invalid amount. {0}")]
    InvalidAmount(String),
    #[error("Invalid request. {0}")]
    ValidationError(String),
    #[error("User {user_id} does not own offer {offer_id}")]
    NotOfferOwner { offer_id: i64, user_id: i64 },
    #[error("The record cannot be deleted while other records refer to it. {0}")]
    ReferencedByDependents(String),
    #[error("A currency with code {0} already exists")]
    CurrencyCodeTaken(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl MarketplaceError {
    pub fn category(&self) -> ErrorCategory {
        use MarketplaceError::*;
        match self {
            CurrencyNotFound(_) | OfferNotFound(_) | DealNotFound(_) | UserNotFound(_) => ErrorCategory::NotFound,
            OfferNotActive(_) |
            SelfDeal |
            InsufficientOfferAmount { .. } |
            InvalidAmount(_) |
            ValidationError(_) |
            CurrencyCodeTaken(_) => ErrorCategory::InvalidOperation,
            ReferencedByDependents(_) => ErrorCategory::Conflict,
            NotOfferOwner { .. } => ErrorCategory::Forbidden,
            DatabaseError(_) => ErrorCategory::Internal,
        }
    }
}

impl From<sqlx::Error> for MarketplaceError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) if is_foreign_key_violation(db.as_ref()) => {
                MarketplaceError::ReferencedByDependents(db.message().to_string())
            },
            e => MarketplaceError::DatabaseError(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthApiError {
    #[error("Username {0} does not exist")]
    UsernameNotFound(String),
    #[error("Invalid password")]
    InvalidPassword,
    #[error("Username {0} is already taken")]
    UsernameTaken(String),
    #[error("Invalid sign up details. {0}")]
    InvalidSignUp(String),
    #[error("Could not hash password. {0}")]
    PasswordHash(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}

pub fn is_foreign_key_violation(e: &dyn sqlx::error::DatabaseError) -> bool {
    e.is_foreign_key_violation() || e.message().contains("FOREIGN KEY constraint failed")
}

pub fn is_unique_violation(e: &dyn sqlx::error::DatabaseError) -> bool {
    e.is_unique_violation() || e.message().contains("UNIQUE constraint failed")
}
