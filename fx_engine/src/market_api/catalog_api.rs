//! The currency catalog and offer listings.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Currency, CurrencySummary, CurrencyUpdate, NewCurrency, NewOffer, Offer},
    market_api::{
        offer_objects::NewOfferRequest,
        query_objects::{OfferQueryFilter, Page, Pagination},
    },
    traits::{CatalogManagement, MarketplaceError},
};

pub const CURRENCY_CODE_LENGTH: usize = 3;
pub const MAX_CURRENCY_NAME_LENGTH: usize = 100;

/// `CatalogApi` maintains the list of tradeable currencies and the offers listed against them.
///
/// All input validation for the catalog happens here, before anything reaches the backend.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Adds a currency to the catalog. The code is upper-cased before it is stored, so `"usd"` becomes `"USD"`.
    pub async fn create_currency(&self, currency: NewCurrency) -> Result<Currency, MarketplaceError> {
        let currency = NewCurrency {
            code: normalize_code(&currency.code)?,
            name: validate_name(&currency.name)?,
            image: currency.image.trim().to_string(),
        };
        let result = self.db.insert_currency(currency).await?;
        info!("💱️ Currency {} ({}) added with id {}", result.code, result.name, result.id);
        Ok(result)
    }

    pub async fn currency(&self, id: i64) -> Result<Currency, MarketplaceError> {
        self.db.fetch_currency(id).await?.ok_or(MarketplaceError::CurrencyNotFound(id))
    }

    pub async fn currencies(&self, page: Pagination) -> Result<Page<CurrencySummary>, MarketplaceError> {
        self.db.fetch_currencies(page).await
    }

    /// Changes the given fields of a currency. The same rules as [`Self::create_currency`] apply to each field.
    pub async fn update_currency(&self, id: i64, update: CurrencyUpdate) -> Result<Currency, MarketplaceError> {
        let update = CurrencyUpdate {
            code: update.code.as_deref().map(normalize_code).transpose()?,
            name: update.name.as_deref().map(validate_name).transpose()?,
            image: update.image.map(|s| s.trim().to_string()),
        };
        if update.is_empty() {
            return self.currency(id).await;
        }
        self.db.update_currency(id, update).await
    }

    /// Removes a currency. Currencies that are bought or sold by any offer cannot be removed.
    pub async fn delete_currency(&self, id: i64) -> Result<(), MarketplaceError> {
        self.db.delete_currency(id).await?;
        info!("💱️ Currency #{id} removed from the catalog");
        Ok(())
    }

    /// Lists a new offer for `seller_id`. The offer starts out active.
    pub async fn create_offer(&self, seller_id: i64, request: NewOfferRequest) -> Result<Offer, MarketplaceError> {
        if request.currency_to_sell_id == request.currency_to_buy_id {
            return Err(MarketplaceError::ValidationError(
                "The currency to sell and the currency to buy must be different".into(),
            ));
        }
        if !request.amount.is_positive() {
            return Err(MarketplaceError::InvalidAmount(format!(
                "Offer amount must be positive, not {}",
                request.amount
            )));
        }
        if !request.exchange_rate.is_positive() {
            return Err(MarketplaceError::InvalidAmount(format!(
                "Exchange rate must be positive, not {}",
                request.exchange_rate
            )));
        }
        let offer = NewOffer {
            seller_id,
            currency_to_sell_id: request.currency_to_sell_id,
            currency_to_buy_id: request.currency_to_buy_id,
            amount: request.amount,
            exchange_rate: request.exchange_rate,
        };
        let offer = self.db.insert_offer(offer).await?;
        info!("💱️ Offer #{} for {} listed by user #{seller_id}", offer.id, offer.amount);
        Ok(offer)
    }

    pub async fn offer(&self, id: i64) -> Result<Offer, MarketplaceError> {
        self.db.fetch_offer(id).await?.ok_or(MarketplaceError::OfferNotFound(id))
    }

    /// All offers that are currently open for deals.
    pub async fn active_offers(&self, page: Pagination) -> Result<Page<Offer>, MarketplaceError> {
        self.db.search_offers(OfferQueryFilter::default().active_only(), page).await
    }

    /// The active offers that sell the given currency.
    pub async fn offers_selling(&self, currency_id: i64, page: Pagination) -> Result<Page<Offer>, MarketplaceError> {
        let query = OfferQueryFilter::default().with_currency_to_sell(currency_id).active_only();
        self.db.search_offers(query, page).await
    }

    pub async fn search_offers(
        &self,
        query: OfferQueryFilter,
        page: Pagination,
    ) -> Result<Page<Offer>, MarketplaceError> {
        trace!("💱️ Searching offers: {query}");
        self.db.search_offers(query, page).await
    }
}

/// Trims and upper-cases a currency code, which must be exactly three characters long.
pub fn normalize_code(code: &str) -> Result<String, MarketplaceError> {
    let code = code.trim();
    if code.chars().count() != CURRENCY_CODE_LENGTH {
        return Err(MarketplaceError::ValidationError(format!(
            "Currency code length must be equal to {CURRENCY_CODE_LENGTH} chars"
        )));
    }
    Ok(code.to_uppercase())
}

fn validate_name(name: &str) -> Result<String, MarketplaceError> {
    let name = name.trim();
    match name.chars().count() {
        0 => Err(MarketplaceError::ValidationError("Currency name cannot be empty".into())),
        n if n > MAX_CURRENCY_NAME_LENGTH => Err(MarketplaceError::ValidationError(format!(
            "Currency name cannot be longer than {MAX_CURRENCY_NAME_LENGTH} chars"
        ))),
        _ => Ok(name.to_string()),
    }
}
