use crate::{
    db_types::{Deal, NewDeal, Offer},
    traits::MarketplaceError,
};

/// The `DealManagement` trait covers every operation that changes the tradeable state of an offer.
///
/// Implementations must guarantee that each method is atomic. In particular, [`DealManagement::create_deal`] must
/// check the offer, decrement its amount and store the deal as a single unit, so that concurrent deals against the
/// same offer can never take more than the offer has left.
#[allow(async_fn_in_trait)]
pub trait DealManagement {
    /// Strikes a deal against an offer.
    ///
    /// The following checks are made, in order. The first one that fails is reported, and nothing is changed:
    /// 1. The offer exists ([`MarketplaceError::OfferNotFound`]).
    /// 2. The offer is active ([`MarketplaceError::OfferNotActive`]).
    /// 3. The buyer is not the seller ([`MarketplaceError::SelfDeal`]).
    /// 4. The offer has at least `deal.amount` left ([`MarketplaceError::InsufficientOfferAmount`]).
    /// 5. The buyer exists ([`MarketplaceError::UserNotFound`]).
    ///
    /// On success the offer's amount is reduced by the deal amount (the offer is deactivated if nothing is left), and
    /// the new deal is returned.
    async fn create_deal(&self, deal: NewDeal) -> Result<Deal, MarketplaceError>;

    /// Sets the active state of an offer on behalf of `user_id`, who must be the seller.
    async fn set_offer_state(&self, offer_id: i64, user_id: i64, active: bool) -> Result<Offer, MarketplaceError>;

    /// Deletes an offer on behalf of `user_id`, who must be the seller. Offers that have deals against them cannot be
    /// deleted.
    async fn delete_offer(&self, offer_id: i64, user_id: i64) -> Result<(), MarketplaceError>;
}
