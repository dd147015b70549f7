use fx_common::FixedPoint;
use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{NewOffer, Offer},
    market_api::query_objects::{OfferQueryFilter, Page, Pagination},
    traits::{is_foreign_key_violation, MarketplaceError},
};

pub async fn insert_offer(offer: NewOffer, conn: &mut SqliteConnection) -> Result<Offer, sqlx::Error> {
    let offer: Offer = sqlx::query_as(
        r#"
        INSERT INTO offers (currency_to_sell_id, currency_to_buy_id, amount, exchange_rate, seller_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(offer.currency_to_sell_id)
    .bind(offer.currency_to_buy_id)
    .bind(offer.amount)
    .bind(offer.exchange_rate)
    .bind(offer.seller_id)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Offer #{} inserted for seller #{}", offer.id, offer.seller_id);
    Ok(offer)
}

pub async fn fetch_offer(id: i64, conn: &mut SqliteConnection) -> Result<Option<Offer>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM offers WHERE id = $1").bind(id).fetch_optional(conn).await
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &OfferQueryFilter) {
    if query.is_empty() {
        return;
    }
    builder.push(" WHERE ");
    let mut where_clause = builder.separated(" AND ");
    if let Some(seller_id) = query.seller_id {
        where_clause.push("seller_id = ");
        where_clause.push_bind_unseparated(seller_id);
    }
    if let Some(id) = query.currency_to_sell_id {
        where_clause.push("currency_to_sell_id = ");
        where_clause.push_bind_unseparated(id);
    }
    if let Some(id) = query.currency_to_buy_id {
        where_clause.push("currency_to_buy_id = ");
        where_clause.push_bind_unseparated(id);
    }
    if let Some(active) = query.active_state {
        where_clause.push("active_state = ");
        where_clause.push_bind_unseparated(active);
    }
}

pub async fn search_offers(
    query: OfferQueryFilter,
    page: Pagination,
    conn: &mut SqliteConnection,
) -> Result<Page<Offer>, sqlx::Error> {
    let mut counter = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM offers");
    push_filters(&mut counter, &query);
    let count: i64 = counter.build_query_scalar().fetch_one(&mut *conn).await?;

    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM offers");
    push_filters(&mut builder, &query);
    builder.push(" ORDER BY id LIMIT ");
    builder.push_bind(page.limit());
    builder.push(" OFFSET ");
    builder.push_bind(page.offset());
    trace!("🗃️ Executing query: {}", builder.sql());
    let offers = builder.build_query_as::<Offer>().fetch_all(conn).await?;
    trace!("🗃️ {} of {count} offers match [{query}]", offers.len());
    Ok(Page::new(offers, count))
}

/// Takes `amount` from the offer, but only if the offer is active, is not owned by `buyer_id`, and has at least
/// `amount` left. The offer is deactivated when its amount reaches zero.
///
/// This is a single statement, so it is atomic. When run as the first statement of a transaction it also takes
/// SQLite's write lock, which serialises concurrent deals on the same database.
///
/// Returns the updated offer, or `None` if any of the conditions did not hold (including the offer not existing).
pub async fn take_from_offer(
    offer_id: i64,
    buyer_id: i64,
    amount: FixedPoint,
    conn: &mut SqliteConnection,
) -> Result<Option<Offer>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE offers SET
            amount = amount - $1,
            active_state = CASE WHEN amount - $1 = 0 THEN 0 ELSE active_state END
        WHERE id = $2 AND active_state = 1 AND seller_id <> $3 AND amount >= $1
        RETURNING *
        "#,
    )
    .bind(amount)
    .bind(offer_id)
    .bind(buyer_id)
    .fetch_optional(conn)
    .await
}

/// Sets the active state of the offer, provided it belongs to `seller_id`. Returns `None` if there is no such offer
/// or it belongs to someone else.
pub async fn set_active_state(
    offer_id: i64,
    seller_id: i64,
    active: bool,
    conn: &mut SqliteConnection,
) -> Result<Option<Offer>, sqlx::Error> {
    sqlx::query_as("UPDATE offers SET active_state = $1 WHERE id = $2 AND seller_id = $3 RETURNING *")
        .bind(active)
        .bind(offer_id)
        .bind(seller_id)
        .fetch_optional(conn)
        .await
}

/// Deletes the offer, provided it belongs to `seller_id`. Returns `false` if there is no such offer or it belongs to
/// someone else.
pub async fn delete_offer(
    offer_id: i64,
    seller_id: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, MarketplaceError> {
    let result = sqlx::query("DELETE FROM offers WHERE id = $1 AND seller_id = $2")
        .bind(offer_id)
        .bind(seller_id)
        .execute(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if is_foreign_key_violation(db.as_ref()) => {
                MarketplaceError::ReferencedByDependents(format!("Offer {offer_id} has deals against it"))
            },
            e => e.into(),
        })?;
    Ok(result.rows_affected() > 0)
}
