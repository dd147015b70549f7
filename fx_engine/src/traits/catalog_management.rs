use crate::{
    db_types::{Currency, CurrencySummary, CurrencyUpdate, NewCurrency, NewOffer, Offer},
    market_api::query_objects::{OfferQueryFilter, Page, Pagination},
    traits::MarketplaceError,
};

/// The `CatalogManagement` trait defines behaviour for maintaining the list of currencies that can be traded, and
/// the offers that sellers list against them.
///
/// Input validation (code length, positive amounts and so on) is the job of [`crate::CatalogApi`]. Backends only need
/// to enforce referential integrity.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Stores a new currency. The code is expected to be normalised already. If the code is already in use,
    /// [`MarketplaceError::CurrencyCodeTaken`] is returned.
    async fn insert_currency(&self, currency: NewCurrency) -> Result<Currency, MarketplaceError>;

    async fn fetch_currency(&self, id: i64) -> Result<Option<Currency>, MarketplaceError>;

    /// Lists currencies in id order, each with the number of offers selling it.
    async fn fetch_currencies(&self, page: Pagination) -> Result<Page<CurrencySummary>, MarketplaceError>;

    /// Applies the update to the currency and returns the result. `None` fields are left unchanged.
    async fn update_currency(&self, id: i64, update: CurrencyUpdate) -> Result<Currency, MarketplaceError>;

    /// Removes the currency. Fails with [`MarketplaceError::ReferencedByDependents`] while any offer buys or sells it.
    async fn delete_currency(&self, id: i64) -> Result<(), MarketplaceError>;

    /// Stores a new, active offer. Both currencies and the seller must exist.
    async fn insert_offer(&self, offer: NewOffer) -> Result<Offer, MarketplaceError>;

    async fn fetch_offer(&self, id: i64) -> Result<Option<Offer>, MarketplaceError>;

    async fn search_offers(&self, query: OfferQueryFilter, page: Pagination) -> Result<Page<Offer>, MarketplaceError>;
}
