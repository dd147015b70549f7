//! Unifies API for accessing users and their trading history.

use std::fmt::Debug;

use log::trace;

use crate::{
    db_types::{Deal, Offer, User},
    market_api::{
        account_objects::UserProfile,
        query_objects::{DealQueryFilter, Page, Pagination},
    },
    traits::{AccountManagement, MarketplaceError},
};

/// The `AccountApi` provides read access to users, their offers and their deals.
pub struct AccountApi<B> {
    db: B,
}

impl<B> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi")
    }
}

impl<B> AccountApi<B>
where B: AccountManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn user(&self, user_id: i64) -> Result<User, MarketplaceError> {
        self.db.fetch_user(user_id).await?.ok_or(MarketplaceError::UserNotFound(user_id))
    }

    /// The user along with the first page of their offers and the deals they have bought.
    pub async fn user_profile(&self, user_id: i64) -> Result<UserProfile, MarketplaceError> {
        let user = self.user(user_id).await?;
        let offers = self.db.fetch_offers_for_user(user_id, Pagination::default()).await?;
        let purchases = DealQueryFilter::default().with_buyer_id(user_id);
        let deals = self.db.search_deals(purchases, Pagination::default()).await?;
        trace!("User #{user_id} has {} offers and {} deals", offers.count, deals.count);
        Ok(UserProfile { user, offers, deals })
    }

    pub async fn offers_for_user(&self, user_id: i64, page: Pagination) -> Result<Page<Offer>, MarketplaceError> {
        self.db.fetch_offers_for_user(user_id, page).await
    }

    pub async fn deal(&self, deal_id: i64) -> Result<Deal, MarketplaceError> {
        self.db.fetch_deal(deal_id).await?.ok_or(MarketplaceError::DealNotFound(deal_id))
    }

    pub async fn deals_for_offer(&self, offer_id: i64, page: Pagination) -> Result<Page<Deal>, MarketplaceError> {
        self.db.search_deals(DealQueryFilter::default().with_offer_id(offer_id), page).await
    }

    pub async fn all_deals(&self, page: Pagination) -> Result<Page<Deal>, MarketplaceError> {
        self.db.search_deals(DealQueryFilter::default(), page).await
    }
}
