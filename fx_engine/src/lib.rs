//! Currency Exchange Marketplace Engine
//!
//! The engine holds the business logic of a currency exchange marketplace. Sellers list offers to sell an amount of
//! one currency for another at a fixed rate. Buyers strike deals that take part, or all, of an offer's remaining
//! amount. The engine makes sure an offer is never oversold, is never bought by its own seller, and cannot be traded
//! while it is switched off.
//!
//! The library is divided into two main sections:
//! 1. Storage backends. The [`traits`] module defines the contracts a backend must fulfil. SQLite is the supported
//!    backend ([`SqliteDatabase`]). You should never need to access the database directly. Instead, use the public
//!    API. The exception is the data types stored in the database. These are defined in the [`db_types`] module and
//!    are public.
//! 2. The engine's public API ([`mod@market_api`]). This provides catalog management, the deal flow, account queries
//!    and authentication.
pub mod db_types;
pub mod helpers;
mod market_api;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use market_api::{
    account_objects,
    accounts_api::AccountApi,
    auth_api::AuthApi,
    catalog_api::CatalogApi,
    deal_flow_api::DealFlowApi,
    offer_objects,
    query_objects,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{AuthApiError, ErrorCategory, MarketplaceError};
