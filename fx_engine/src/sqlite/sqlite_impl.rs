//! `SqliteDatabase` is a concrete implementation of a marketplace backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateError, SqliteConnection, SqlitePool};

use super::db::{currencies, db_url, deals, new_pool, offers, users};
use crate::{
    db_types::{Currency, CurrencySummary, CurrencyUpdate, Deal, NewCurrency, NewDeal, NewOffer, NewUser, Offer, User},
    market_api::query_objects::{DealQueryFilter, OfferQueryFilter, Page, Pagination},
    traits::{
        AccountManagement,
        AuthApiError,
        AuthManagement,
        CatalogManagement,
        DealManagement,
        MarketplaceError,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({})", self.url)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn insert_currency(&self, currency: NewCurrency) -> Result<Currency, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        currencies::insert_currency(currency, &mut conn).await
    }

    async fn fetch_currency(&self, id: i64) -> Result<Option<Currency>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let currency = currencies::fetch_currency(id, &mut conn).await?;
        Ok(currency)
    }

    async fn fetch_currencies(&self, page: Pagination) -> Result<Page<CurrencySummary>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let page = currencies::fetch_currencies(page, &mut conn).await?;
        Ok(page)
    }

    async fn update_currency(&self, id: i64, update: CurrencyUpdate) -> Result<Currency, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let currency =
            currencies::update_currency(id, update, &mut conn).await?.ok_or(MarketplaceError::CurrencyNotFound(id))?;
        debug!("🗃️ Currency #{id} updated to {}", currency.code);
        Ok(currency)
    }

    async fn delete_currency(&self, id: i64) -> Result<(), MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        if currencies::delete_currency(id, &mut conn).await? {
            debug!("🗃️ Currency #{id} deleted");
            Ok(())
        } else {
            Err(MarketplaceError::CurrencyNotFound(id))
        }
    }

    async fn insert_offer(&self, offer: NewOffer) -> Result<Offer, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        for currency_id in [offer.currency_to_sell_id, offer.currency_to_buy_id] {
            if currencies::fetch_currency(currency_id, &mut tx).await?.is_none() {
                return Err(MarketplaceError::CurrencyNotFound(currency_id));
            }
        }
        if !users::user_exists(offer.seller_id, &mut tx).await? {
            return Err(MarketplaceError::UserNotFound(offer.seller_id));
        }
        let offer = offers::insert_offer(offer, &mut tx).await?;
        tx.commit().await?;
        Ok(offer)
    }

    async fn fetch_offer(&self, id: i64) -> Result<Option<Offer>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let offer = offers::fetch_offer(id, &mut conn).await?;
        Ok(offer)
    }

    async fn search_offers(&self, query: OfferQueryFilter, page: Pagination) -> Result<Page<Offer>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let offers = offers::search_offers(query, page, &mut conn).await?;
        Ok(offers)
    }
}

impl DealManagement for SqliteDatabase {
    /// The offer is decremented by a single conditional `UPDATE` that runs as the first statement of the transaction.
    /// SQLite allows one writer at a time, so two deals against the same offer cannot both see the same remaining
    /// amount. If the update matches nothing, the offer is re-read inside the same transaction to work out which
    /// precondition failed. Any early return drops `tx`, which rolls everything back.
    async fn create_deal(&self, deal: NewDeal) -> Result<Deal, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let offer = match offers::take_from_offer(deal.offer_id, deal.buyer_id, deal.amount, &mut tx).await? {
            Some(offer) => offer,
            None => {
                let err = rejected_deal_reason(&deal, &mut tx).await?;
                debug!("🗃️ Deal on offer #{} for {} rejected. {err}", deal.offer_id, deal.amount);
                return Err(err);
            },
        };
        trace!("🗃️ Offer #{} now has {} remaining (active: {})", offer.id, offer.amount, offer.active_state);
        if !users::user_exists(deal.buyer_id, &mut tx).await? {
            return Err(MarketplaceError::UserNotFound(deal.buyer_id));
        }
        let deal = deals::insert_deal(deal, &mut tx).await?;
        tx.commit().await?;
        Ok(deal)
    }

    async fn set_offer_state(&self, offer_id: i64, user_id: i64, active: bool) -> Result<Offer, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        match offers::set_active_state(offer_id, user_id, active, &mut tx).await? {
            Some(offer) => {
                tx.commit().await?;
                debug!("🗃️ Offer #{offer_id} active state set to {active}");
                Ok(offer)
            },
            None => Err(ownership_failure(offer_id, user_id, &mut tx).await?),
        }
    }

    async fn delete_offer(&self, offer_id: i64, user_id: i64) -> Result<(), MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        if offers::delete_offer(offer_id, user_id, &mut tx).await? {
            tx.commit().await?;
            debug!("🗃️ Offer #{offer_id} deleted");
            Ok(())
        } else {
            Err(ownership_failure(offer_id, user_id, &mut tx).await?)
        }
    }
}

/// Works out why [`offers::take_from_offer`] refused the deal. The checks run in the documented precondition order.
async fn rejected_deal_reason(
    deal: &NewDeal,
    conn: &mut SqliteConnection,
) -> Result<MarketplaceError, MarketplaceError> {
    let reason = match offers::fetch_offer(deal.offer_id, conn).await? {
        None => MarketplaceError::OfferNotFound(deal.offer_id),
        Some(offer) if !offer.active_state => MarketplaceError::OfferNotActive(offer.id),
        Some(offer) if offer.seller_id == deal.buyer_id => MarketplaceError::SelfDeal,
        Some(offer) if offer.amount < deal.amount => {
            MarketplaceError::InsufficientOfferAmount { requested: deal.amount, remaining: offer.amount }
        },
        Some(offer) => MarketplaceError::DatabaseError(format!("Offer #{} could not be updated", offer.id)),
    };
    Ok(reason)
}

/// Works out why an owner-restricted update of an offer matched nothing.
async fn ownership_failure(
    offer_id: i64,
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<MarketplaceError, MarketplaceError> {
    let reason = match offers::fetch_offer(offer_id, conn).await? {
        None => MarketplaceError::OfferNotFound(offer_id),
        Some(_) => MarketplaceError::NotOfferOwner { offer_id, user_id },
    };
    Ok(reason)
}

impl AccountManagement for SqliteDatabase {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user(user_id, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_offers_for_user(&self, user_id: i64, page: Pagination) -> Result<Page<Offer>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let query = OfferQueryFilter::default().with_seller_id(user_id);
        let offers = offers::search_offers(query, page, &mut conn).await?;
        Ok(offers)
    }

    async fn fetch_deal(&self, deal_id: i64) -> Result<Option<Deal>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let deal = deals::fetch_deal(deal_id, &mut conn).await?;
        Ok(deal)
    }

    async fn search_deals(&self, query: DealQueryFilter, page: Pagination) -> Result<Page<Deal>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let deals = deals::search_deals(query, page, &mut conn).await?;
        Ok(deals)
    }
}

impl AuthManagement for SqliteDatabase {
    async fn insert_user(&self, user: NewUser) -> Result<User, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user_by_username(username, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_password_hash(&self, username: &str) -> Result<Option<String>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        let hash = users::fetch_password_hash(username, &mut conn).await?;
        Ok(hash)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the URL in `FX_DATABASE_URL`, or the default.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
