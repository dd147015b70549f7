use log::debug;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{Deal, NewDeal},
    market_api::query_objects::{DealQueryFilter, Page, Pagination},
};

/// Stores the deal. This does not touch the offer; see [`super::offers::take_from_offer`].
pub async fn insert_deal(deal: NewDeal, conn: &mut SqliteConnection) -> Result<Deal, sqlx::Error> {
    let deal: Deal = sqlx::query_as(
        r#"
        INSERT INTO deals (buyer_id, offer_id, amount) VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(deal.buyer_id)
    .bind(deal.offer_id)
    .bind(deal.amount)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Deal #{} for {} on offer #{} inserted", deal.id, deal.amount, deal.offer_id);
    Ok(deal)
}

pub async fn fetch_deal(id: i64, conn: &mut SqliteConnection) -> Result<Option<Deal>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM deals WHERE id = $1").bind(id).fetch_optional(conn).await
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &DealQueryFilter) {
    if query.is_empty() {
        return;
    }
    builder.push(" WHERE ");
    let mut where_clause = builder.separated(" AND ");
    if let Some(offer_id) = query.offer_id {
        where_clause.push("offer_id = ");
        where_clause.push_bind_unseparated(offer_id);
    }
    if let Some(buyer_id) = query.buyer_id {
        where_clause.push("buyer_id = ");
        where_clause.push_bind_unseparated(buyer_id);
    }
}

pub async fn search_deals(
    query: DealQueryFilter,
    page: Pagination,
    conn: &mut SqliteConnection,
) -> Result<Page<Deal>, sqlx::Error> {
    let mut counter = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM deals");
    push_filters(&mut counter, &query);
    let count: i64 = counter.build_query_scalar().fetch_one(&mut *conn).await?;

    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM deals");
    push_filters(&mut builder, &query);
    builder.push(" ORDER BY id LIMIT ");
    builder.push_bind(page.limit());
    builder.push(" OFFSET ");
    builder.push_bind(page.offset());
    let deals = builder.build_query_as::<Deal>().fetch_all(conn).await?;
    Ok(Page::new(deals, count))
}
