//! # Marketplace public API
//!
//! The `market_api` module exposes the programmatic API of the exchange engine. The API is modular, so that clients
//! can pick the functionality they need.
//!
//! * [`catalog_api`] maintains the currency list and offer listings.
//! * [`deal_flow_api`] strikes deals against offers and manages offer state. It guarantees that an offer's remaining
//!   amount is never oversold.
//! * [`accounts_api`] answers questions about users and their trading history.
//! * [`auth_api`] registers users and checks their credentials.
//!
//! # API usage
//!
//! Every API is created by supplying a backend that implements the trait the API needs:
//!
//! ```rust,ignore
//! use fx_engine::{DealFlowApi, SqliteDatabase, db_types::FixedPoint};
//! let db = SqliteDatabase::new_with_url("sqlite://data/fx_market.db", 25).await?;
//! // SqliteDatabase implements DealManagement
//! let api = DealFlowApi::new(db);
//! let deal = api.create_deal(offer_id, buyer_id, "100.00".parse::<FixedPoint>()?).await?;
//! ```
pub mod account_objects;
pub mod accounts_api;
pub mod auth_api;
pub mod catalog_api;
pub mod deal_flow_api;
pub mod offer_objects;
pub mod query_objects;
