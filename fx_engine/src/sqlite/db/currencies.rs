use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Currency, CurrencySummary, CurrencyUpdate, NewCurrency},
    market_api::query_objects::{Page, Pagination},
    traits::{is_foreign_key_violation, is_unique_violation, MarketplaceError},
};

fn map_unique_code(code: &str, e: sqlx::Error) -> MarketplaceError {
    match e {
        sqlx::Error::Database(db) if is_unique_violation(db.as_ref()) => {
            MarketplaceError::CurrencyCodeTaken(code.to_string())
        },
        e => e.into(),
    }
}

pub async fn insert_currency(currency: NewCurrency, conn: &mut SqliteConnection) -> Result<Currency, MarketplaceError> {
    let result = sqlx::query_as(
        r#"
        INSERT INTO currencies (code, name, image) VALUES ($1, $2, $3)
        RETURNING id, code, name, image
        "#,
    )
    .bind(&currency.code)
    .bind(&currency.name)
    .bind(&currency.image)
    .fetch_one(conn)
    .await
    .map_err(|e| map_unique_code(&currency.code, e))?;
    debug!("🗃️ Currency {} inserted", currency.code);
    Ok(result)
}

pub async fn fetch_currency(id: i64, conn: &mut SqliteConnection) -> Result<Option<Currency>, sqlx::Error> {
    sqlx::query_as("SELECT id, code, name, image FROM currencies WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_currencies(
    page: Pagination,
    conn: &mut SqliteConnection,
) -> Result<Page<CurrencySummary>, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM currencies").fetch_one(&mut *conn).await?;
    let items = sqlx::query_as(
        r#"
        SELECT
            currencies.id,
            currencies.code,
            currencies.name,
            currencies.image,
            (SELECT COUNT(*) FROM offers WHERE offers.currency_to_sell_id = currencies.id) AS offers_count
        FROM currencies
        ORDER BY currencies.id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(conn)
    .await?;
    Ok(Page::new(items, count))
}

/// Applies the non-empty fields of `update`. Returns `None` if the currency does not exist.
pub async fn update_currency(
    id: i64,
    update: CurrencyUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Currency>, MarketplaceError> {
    let code = update.code.clone().unwrap_or_default();
    let result = sqlx::query_as(
        r#"
        UPDATE currencies SET
            code = COALESCE($1, code),
            name = COALESCE($2, name),
            image = COALESCE($3, image)
        WHERE id = $4
        RETURNING id, code, name, image
        "#,
    )
    .bind(update.code)
    .bind(update.name)
    .bind(update.image)
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(|e| map_unique_code(&code, e))?;
    Ok(result)
}

/// Deletes the currency. Returns `false` if there was no such currency.
pub async fn delete_currency(id: i64, conn: &mut SqliteConnection) -> Result<bool, MarketplaceError> {
    let result = sqlx::query("DELETE FROM currencies WHERE id = $1").bind(id).execute(conn).await.map_err(|e| {
        match e {
            sqlx::Error::Database(db) if is_foreign_key_violation(db.as_ref()) => {
                MarketplaceError::ReferencedByDependents(format!("Currency {id} is used by existing offers"))
            },
            e => e.into(),
        }
    })?;
    Ok(result.rows_affected() > 0)
}
