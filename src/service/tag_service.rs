use crate::errors::{ApiError, ApiResult};
use crate::model::tag::Tag;
use sqlx::{query, query_as, SqlitePool};
use tracing::debug;

impl Tag {
    pub async fn get_all(pool: &SqlitePool) -> ApiResult<Vec<Tag>> {
        let tags = query_as::<_, Tag>("SELECT id, name FROM tag ORDER BY id")
            .fetch_all(pool)
            .await?;

        Ok(tags)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> ApiResult<Option<Tag>> {
        let tag = query_as::<_, Tag>("SELECT id, name FROM tag WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(tag)
    }

    pub async fn create(pool: &SqlitePool, name: &str) -> ApiResult<Tag> {
        let tag = query_as::<_, Tag>(
            r#"
            INSERT INTO tag (name)
            VALUES (?)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        debug!("Tag inserted, id: {}", tag.id);
        Ok(tag)
    }

    /// Deletes a tag together with every blog referencing it (`ON DELETE CASCADE`).
    pub async fn delete(pool: &SqlitePool, id: i64) -> ApiResult<()> {
        let rv = query("DELETE FROM tag WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if rv.rows_affected() == 0 {
            return Err(tag_not_found());
        }
        Ok(())
    }
}

pub fn tag_not_found() -> ApiError {
    ApiError::NotFound("Tag not found".to_owned())
}
