use fx_common::FixedPoint;
use serde::{Deserialize, Serialize};

/// What a seller supplies to list an offer. The seller is always the authenticated caller, so there is no seller
/// field here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOfferRequest {
    pub currency_to_sell_id: i64,
    pub currency_to_buy_id: i64,
    pub amount: FixedPoint,
    pub exchange_rate: FixedPoint,
}

/// Switches an offer on or off.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OfferStateUpdate {
    pub active_state: bool,
}
