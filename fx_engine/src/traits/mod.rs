//! # Backend interface contracts
//!
//! This module defines the behaviour a storage backend must expose in order to drive the marketplace APIs.
//!
//! * [`CatalogManagement`] maintains currencies and offer listings.
//! * [`DealManagement`] covers the operations that change the tradeable state of an offer. This is where the
//!   consistency of offer amounts is enforced.
//! * [`AccountManagement`] provides read-only queries over users, their offers and their deals.
//! * [`AuthManagement`] stores user credentials.
mod account_management;
mod auth_management;
mod catalog_management;
mod deal_management;
mod errors;

pub use account_management::AccountManagement;
pub use auth_management::AuthManagement;
pub use catalog_management::CatalogManagement;
pub use deal_management::DealManagement;
pub use errors::{is_foreign_key_violation, is_unique_violation, AuthApiError, ErrorCategory, MarketplaceError};
