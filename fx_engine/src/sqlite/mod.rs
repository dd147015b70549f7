//! SQLite backend for the marketplace engine.
//!
//! [`SqliteDatabase`] implements every backend trait. The free functions in [`db`] do the actual querying.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
