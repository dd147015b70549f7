use chrono::{DateTime, Utc};
pub use fx_common::FixedPoint;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

//--------------------------------------     Currency       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Currency {
    pub id: i64,
    /// Three-letter currency code. Always stored in upper case.
    pub code: String,
    pub name: String,
    /// A path or URL to the currency's image.
    pub image: String,
}

/// A currency, as listed in the catalog, along with the number of offers that are selling it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CurrencySummary {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub image: String,
    pub offers_count: i64,
}

//--------------------------------------     NewCurrency       ------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCurrency {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
}

impl NewCurrency {
    pub fn new<S: Into<String>>(code: S, name: S) -> Self {
        Self { code: code.into(), name: name.into(), image: String::default() }
    }
}

//--------------------------------------     CurrencyUpdate       ---------------------------------------------------
/// The set of currency fields that may be changed after creation. Fields that are `None` are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencyUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl CurrencyUpdate {
    pub fn with_code<S: Into<String>>(mut self, code: S) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.name.is_none() && self.image.is_none()
    }
}

//--------------------------------------        Offer       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Offer {
    pub id: i64,
    pub currency_to_sell_id: i64,
    pub currency_to_buy_id: i64,
    /// The quantity of `currency_to_sell` still available. This decreases as deals are struck against the offer.
    pub amount: FixedPoint,
    pub exchange_rate: FixedPoint,
    pub seller_id: i64,
    pub added_time: DateTime<Utc>,
    pub active_state: bool,
}

//--------------------------------------        NewOffer       ------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOffer {
    pub seller_id: i64,
    pub currency_to_sell_id: i64,
    pub currency_to_buy_id: i64,
    pub amount: FixedPoint,
    pub exchange_rate: FixedPoint,
}

//--------------------------------------        Deal       ----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Deal {
    pub id: i64,
    pub buyer_id: i64,
    pub offer_id: i64,
    pub amount: FixedPoint,
    pub deal_time: DateTime<Utc>,
}

//--------------------------------------        NewDeal       -------------------------------------------------------
#[derive(Debug, Clone, Copy)]
pub struct NewDeal {
    pub offer_id: i64,
    pub buyer_id: i64,
    pub amount: FixedPoint,
}

impl NewDeal {
    pub fn new(offer_id: i64, buyer_id: i64, amount: FixedPoint) -> Self {
        Self { offer_id, buyer_id, amount }
    }
}

//--------------------------------------        User       ----------------------------------------------------------
/// A registered user. The password hash is not part of this struct.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

//--------------------------------------        NewUser       -------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    /// An argon2 PHC string
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}
