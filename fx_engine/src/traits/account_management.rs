use crate::{
    db_types::{Deal, Offer, User},
    market_api::query_objects::{DealQueryFilter, Page, Pagination},
    traits::MarketplaceError,
};

/// Read-only queries about users and their trading history.
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, MarketplaceError>;

    /// All offers listed by the user, active or not.
    async fn fetch_offers_for_user(&self, user_id: i64, page: Pagination) -> Result<Page<Offer>, MarketplaceError>;

    async fn fetch_deal(&self, deal_id: i64) -> Result<Option<Deal>, MarketplaceError>;

    async fn search_deals(&self, query: DealQueryFilter, page: Pagination) -> Result<Page<Deal>, MarketplaceError>;
}
