/// Tag repository, including item-tag link rows
use crate::models::Tag;
use sqlx::PgPool;

pub async fn create_tag(pool: &PgPool, name: &str, store_id: i64) -> Result<Tag, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        r#"
        INSERT INTO tags (name, store_id)
        VALUES ($1, $2)
        RETURNING id, name, store_id
        "#,
    )
    .bind(name)
    .bind(store_id)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        r#"
        SELECT id, name, store_id FROM tags WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_for_store(pool: &PgPool, store_id: i64) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        r#"
        SELECT id, name, store_id FROM tags WHERE store_id = $1 ORDER BY id
        "#,
    )
    .bind(store_id)
    .fetch_all(pool)
    .await
}

pub async fn list_for_item(pool: &PgPool, item_id: i64) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name, t.store_id
        FROM tags t
        JOIN items_tags it ON it.tag_id = t.id
        WHERE it.item_id = $1
        ORDER BY t.id
        "#,
    )
    .bind(item_id)
    .fetch_all(pool)
    .await
}

/// Number of items still linked to the tag.
pub async fn linked_item_count(pool: &PgPool, tag_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM items_tags WHERE tag_id = $1
        "#,
    )
    .bind(tag_id)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Link a tag to an item. Idempotent: relinking an existing pair is a no-op.
pub async fn link_item(pool: &PgPool, item_id: i64, tag_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO items_tags (item_id, tag_id)
        VALUES ($1, $2)
        ON CONFLICT (item_id, tag_id) DO NOTHING
        "#,
    )
    .bind(item_id)
    .bind(tag_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove a tag from an item. Returns rows removed.
pub async fn unlink_item(pool: &PgPool, item_id: i64, tag_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM items_tags WHERE item_id = $1 AND tag_id = $2
        "#,
    )
    .bind(item_id)
    .bind(tag_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
