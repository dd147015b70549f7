use fx_common::{FixedPoint, Secret};
use fx_engine::query_objects::OfferQueryFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// The body of `POST /api/deals`. The buyer is the authenticated user; `buyer_id`, if given, must
/// match it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDealRequest {
    pub offer_id: i64,
    #[serde(default)]
    pub buyer_id: Option<i64>,
    pub amount: FixedPoint,
}

/// Optional filters for `GET /api/offers`. Only active offers are listed unless `active_state=false` is given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferSearchParams {
    pub currency_to_sell: Option<i64>,
    pub currency_to_buy: Option<i64>,
    pub active_state: Option<bool>,
}

impl From<OfferSearchParams> for OfferQueryFilter {
    fn from(params: OfferSearchParams) -> Self {
        let mut query = OfferQueryFilter::default().with_active_state(params.active_state.unwrap_or(true));
        if let Some(id) = params.currency_to_sell {
            query = query.with_currency_to_sell(id);
        }
        if let Some(id) = params.currency_to_buy {
            query = query.with_currency_to_buy(id);
        }
        query
    }
}
