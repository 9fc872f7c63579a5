/// Item repository
use crate::models::Item;
use sqlx::PgPool;

pub async fn create_item(
    pool: &PgPool,
    name: &str,
    price: f64,
    store_id: i64,
) -> Result<Item, sqlx::Error> {
    sqlx::query_as::<_, Item>(
        r#"
        INSERT INTO items (name, price, store_id)
        VALUES ($1, $2, $3)
        RETURNING id, name, price, store_id, created_at
        "#,
    )
    .bind(name)
    .bind(price)
    .bind(store_id)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(
        r#"
        SELECT id, name, price, store_id, created_at FROM items WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(
        r#"
        SELECT id, name, price, store_id, created_at FROM items ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Update name and price of an existing item.
pub async fn update(
    pool: &PgPool,
    id: i64,
    name: &str,
    price: f64,
) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(
        r#"
        UPDATE items
        SET name = $1, price = $2
        WHERE id = $3
        RETURNING id, name, price, store_id, created_at
        "#,
    )
    .bind(name)
    .bind(price)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
