use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: i64 = 100;
pub const MAX_PAGE_LIMIT: i64 = 100;

//--------------------------------------     Pagination       -------------------------------------------------------
/// Limit/offset paging for list queries.
///
/// Missing values fall back to the defaults (`limit = 100`, `offset = 0`). The limit is always clamped to `1..=100`
/// and a negative offset is treated as zero, so a `Pagination` can be built straight from untrusted query strings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit: Some(limit), offset: Some(offset) }
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

//--------------------------------------        Page       ----------------------------------------------------------
/// One page of results. `count` is the total number of matching records, not the number of items on this page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, count: i64) -> Self {
        Self { items, count }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { items: Vec::new(), count: 0 }
    }
}

//--------------------------------------   OfferQueryFilter    ------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferQueryFilter {
    pub seller_id: Option<i64>,
    pub currency_to_sell_id: Option<i64>,
    pub currency_to_buy_id: Option<i64>,
    pub active_state: Option<bool>,
}

impl OfferQueryFilter {
    pub fn with_seller_id(mut self, seller_id: i64) -> Self {
        self.seller_id = Some(seller_id);
        self
    }

    pub fn with_currency_to_sell(mut self, currency_id: i64) -> Self {
        self.currency_to_sell_id = Some(currency_id);
        self
    }

    pub fn with_currency_to_buy(mut self, currency_id: i64) -> Self {
        self.currency_to_buy_id = Some(currency_id);
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_state = Some(true);
        self
    }

    pub fn with_active_state(mut self, active: bool) -> Self {
        self.active_state = Some(active);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.seller_id.is_none() &&
            self.currency_to_sell_id.is_none() &&
            self.currency_to_buy_id.is_none() &&
            self.active_state.is_none()
    }
}

impl Display for OfferQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "No filters.");
        }
        if let Some(seller_id) = self.seller_id {
            write!(f, "seller_id: {seller_id}. ")?;
        }
        if let Some(id) = self.currency_to_sell_id {
            write!(f, "selling: {id}. ")?;
        }
        if let Some(id) = self.currency_to_buy_id {
            write!(f, "buying: {id}. ")?;
        }
        if let Some(active) = self.active_state {
            write!(f, "active: {active}. ")?;
        }
        Ok(())
    }
}

//--------------------------------------   DealQueryFilter    -------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealQueryFilter {
    pub offer_id: Option<i64>,
    pub buyer_id: Option<i64>,
}

impl DealQueryFilter {
    pub fn with_offer_id(mut self, offer_id: i64) -> Self {
        self.offer_id = Some(offer_id);
        self
    }

    pub fn with_buyer_id(mut self, buyer_id: i64) -> Self {
        self.buyer_id = Some(buyer_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.offer_id.is_none() && self.buyer_id.is_none()
    }
}

impl Display for DealQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "No filters.");
        }
        if let Some(offer_id) = self.offer_id {
            write!(f, "offer_id: {offer_id}. ")?;
        }
        if let Some(buyer_id) = self.buyer_id {
            write!(f, "buyer_id: {buyer_id}. ")?;
        }
        Ok(())
    }
}
