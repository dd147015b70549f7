use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, User},
    traits::{is_unique_violation, AuthApiError},
};

pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, AuthApiError> {
    let result: User = sqlx::query_as(
        r#"
        INSERT INTO users (username, password_hash, first_name, last_name, email)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, first_name, last_name, email
        "#,
    )
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if is_unique_violation(db.as_ref()) => {
            AuthApiError::UsernameTaken(user.username.clone())
        },
        e => e.into(),
    })?;
    debug!("🗃️ User {} registered with id {}", result.username, result.id);
    Ok(result)
}

pub async fn fetch_user(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT id, username, first_name, last_name, email FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn fetch_user_by_username(username: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT id, username, first_name, last_name, email FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(conn)
        .await
}

pub async fn fetch_password_hash(username: &str, conn: &mut SqliteConnection) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT password_hash FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(conn)
        .await
}

pub async fn user_exists(id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(exists)
}
