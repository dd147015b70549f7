use std::collections::HashMap;

use cucumber::World;
use fx_engine::{
    db_types::Deal,
    test_utils::prepare_env::{create_database, random_db_path, run_migrations},
    AccountApi,
    AuthApi,
    AuthApiError,
    CatalogApi,
    DealFlowApi,
    MarketplaceError,
    SqliteDatabase,
};
use log::*;

#[derive(Default, Debug, World)]
pub struct MarketWorld {
    pub system: Option<MarketSystem>,
    /// Usernames to user ids
    pub users: HashMap<String, i64>,
    /// Currency codes (as written in the scenario) to currency ids
    pub currencies: HashMap<String, i64>,
    /// Offer labels to offer ids
    pub offers: HashMap<String, i64>,
    pub last_deal: Option<Deal>,
    pub last_error: Option<MarketplaceError>,
    pub last_auth_error: Option<AuthApiError>,
}

#[derive(Debug)]
pub struct MarketSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub catalog: CatalogApi<SqliteDatabase>,
    pub deals: DealFlowApi<SqliteDatabase>,
    pub accounts: AccountApi<SqliteDatabase>,
    pub auth: AuthApi<SqliteDatabase>,
}

impl MarketWorld {
    pub fn system(&self) -> &MarketSystem {
        self.system.as_ref().expect("Marketplace not initialised")
    }

    pub fn user_id(&self, username: &str) -> i64 {
        *self.users.get(username).unwrap_or_else(|| panic!("Unknown user {username}"))
    }

    pub fn currency_id(&self, code: &str) -> i64 {
        *self.currencies.get(code).unwrap_or_else(|| panic!("Unknown currency {code}"))
    }

    pub fn offer_id(&self, label: &str) -> i64 {
        *self.offers.get(label).unwrap_or_else(|| panic!("Unknown offer {label}"))
    }

    /// Records the outcome of a marketplace call so that later steps can check it.
    pub fn record<T>(&mut self, result: Result<T, MarketplaceError>) -> Option<T> {
        match result {
            Ok(v) => {
                self.last_error = None;
                Some(v)
            },
            Err(e) => {
                debug!("Marketplace call failed: {e}");
                self.last_error = Some(e);
                None
            },
        }
    }
}

impl MarketSystem {
    pub async fn new() -> Self {
        let url = prepare_test_env().await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        Self {
            db_path: url,
            catalog: CatalogApi::new(db.clone()),
            deals: DealFlowApi::new(db.clone()),
            accounts: AccountApi::new(db.clone()),
            auth: AuthApi::new(db.clone()),
            db,
        }
    }
}

pub async fn prepare_test_env() -> String {
    let path = random_db_path();
    create_database(&path).await;
    run_migrations(&path).await;
    path
}

/// The variant name of an error, for matching against scenario text.
pub fn error_name(e: &MarketplaceError) -> &'static str {
    use MarketplaceError::*;
    match e {
        CurrencyNotFound(_) => "CurrencyNotFound",
        OfferNotFound(_) => "OfferNotFound",
        DealNotFound(_) => "DealNotFound",
        UserNotFound(_) => "UserNotFound",
        OfferNotActive(_) => "OfferNotActive",
        SelfDeal => "SelfDeal",
        InsufficientOfferAmount { .. } => "InsufficientOfferAmount",
        InvalidAmount(_) => "InvalidAmount",
        ValidationError(_) => "ValidationError",
        NotOfferOwner { .. } => "NotOfferOwner",
        ReferencedByDependents(_) => "ReferencedByDependents",
        CurrencyCodeTaken(_) => "CurrencyCodeTaken",
        DatabaseError(_) => "DatabaseError",
    }
}
