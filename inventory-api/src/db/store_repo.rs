/// Store repository
use crate::models::Store;
use sqlx::PgPool;

pub async fn create_store(pool: &PgPool, name: &str) -> Result<Store, sqlx::Error> {
    sqlx::query_as::<_, Store>(
        r#"
        INSERT INTO stores (name)
        VALUES ($1)
        RETURNING id, name, created_at
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Store>, sqlx::Error> {
    sqlx::query_as::<_, Store>(
        r#"
        SELECT id, name, created_at FROM stores WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Store>, sqlx::Error> {
    sqlx::query_as::<_, Store>(
        r#"
        SELECT id, name, created_at FROM stores ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Delete a store; items and tags cascade. Returns rows removed.
pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM stores WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
