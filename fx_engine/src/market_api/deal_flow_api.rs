use std::fmt::Debug;

use fx_common::FixedPoint;
use log::*;

use crate::{
    db_types::{Deal, NewDeal, Offer},
    traits::{DealManagement, MarketplaceError},
};

/// `DealFlowApi` is the primary API for trading. It strikes deals against offers and controls whether offers are open
/// for trading.
///
/// Every call is a single atomic unit of work in the backend. In particular, concurrent calls to
/// [`DealFlowApi::create_deal`] against the same offer can never take more than the offer has left.
pub struct DealFlowApi<B> {
    db: B,
}

impl<B> Debug for DealFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DealFlowApi")
    }
}

impl<B> DealFlowApi<B>
where B: DealManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// `buyer_id` takes `amount` of the currency being sold from the offer.
    ///
    /// The request is refused, and nothing changes, if
    /// * `amount` is not positive,
    /// * the offer does not exist,
    /// * the offer is not active,
    /// * the buyer is the seller,
    /// * the offer has less than `amount` left, or
    /// * the buyer does not exist.
    ///
    /// These are checked in this order, and only the first failure is reported. On success, the offer's remaining
    /// amount is reduced by `amount`, and the new deal is returned. An offer that is used up is switched off.
    pub async fn create_deal(
        &self,
        offer_id: i64,
        buyer_id: i64,
        amount: FixedPoint,
    ) -> Result<Deal, MarketplaceError> {
        if !amount.is_positive() {
            return Err(MarketplaceError::InvalidAmount(format!("Deal amount must be positive, not {amount}")));
        }
        let deal = self.db.create_deal(NewDeal::new(offer_id, buyer_id, amount)).await.map_err(|e| {
            debug!("🔄️ Deal for {amount} on offer #{offer_id} by user #{buyer_id} was refused. {e}");
            e
        })?;
        info!("🔄️ Deal #{} struck. User #{buyer_id} took {amount} from offer #{offer_id}", deal.id);
        Ok(deal)
    }

    /// Opens or closes an offer for trading. Only the seller may do this. The remaining amount is not affected.
    pub async fn toggle_offer_state(
        &self,
        offer_id: i64,
        user_id: i64,
        active: bool,
    ) -> Result<Offer, MarketplaceError> {
        let offer = self.db.set_offer_state(offer_id, user_id, active).await?;
        info!("🔄️ Offer #{offer_id} is now {}", if offer.active_state { "active" } else { "inactive" });
        Ok(offer)
    }

    /// Removes an offer for good. Only the seller may do this, and only while no deals refer to the offer.
    pub async fn delete_offer(&self, offer_id: i64, user_id: i64) -> Result<(), MarketplaceError> {
        self.db.delete_offer(offer_id, user_id).await?;
        info!("🔄️ Offer #{offer_id} deleted by user #{user_id}");
        Ok(())
    }
}
