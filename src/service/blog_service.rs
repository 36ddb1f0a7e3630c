use crate::errors::{ApiError, ApiResult};
use crate::model::blog::{Blog, BlogRequest};
use chrono::{SubsecRound, Utc};
use sqlx::{query, query_as, SqlitePool};
use tracing::debug;

impl Blog {
    pub async fn get_all(pool: &SqlitePool) -> ApiResult<Vec<Blog>> {
        let blogs = query_as::<_, Blog>(
            r#"
            SELECT id, title, description, blog_image, date_created, content, tag_id
            FROM blog
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(blogs)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> ApiResult<Option<Blog>> {
        let blog = query_as::<_, Blog>(
            r#"
            SELECT id, title, description, blog_image, date_created, content, tag_id
            FROM blog
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(blog)
    }

    /// Inserts a blog stamped with the current time. A `tag_id` without a matching tag
    /// fails on the foreign key and leaves no row behind.
    pub async fn create(pool: &SqlitePool, blog: &BlogRequest) -> ApiResult<Blog> {
        // DATETIME columns keep whole seconds
        let now = Utc::now().trunc_subsecs(0);

        let created = query_as::<_, Blog>(
            r#"
            INSERT INTO blog (title, description, tag_id, blog_image, date_created, content)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, title, description, blog_image, date_created, content, tag_id
            "#,
        )
        .bind(&blog.title)
        .bind(&blog.description)
        .bind(blog.tag_id)
        .bind(blog.image())
        .bind(now)
        .bind(&blog.content)
        .fetch_one(pool)
        .await?;

        debug!("Blog inserted, id: {}", created.id);
        Ok(created)
    }

    /// Replaces every editable field. `date_created` is never touched.
    pub async fn update(pool: &SqlitePool, id: i64, blog: &BlogRequest) -> ApiResult<()> {
        let rv = query(
            r#"
            UPDATE blog
            SET title = ?, description = ?, blog_image = ?, content = ?, tag_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&blog.title)
        .bind(&blog.description)
        .bind(blog.image())
        .bind(&blog.content)
        .bind(blog.tag_id)
        .bind(id)
        .execute(pool)
        .await?;

        if rv.rows_affected() == 0 {
            return Err(blog_not_found());
        }
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> ApiResult<()> {
        let rv = query("DELETE FROM blog WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if rv.rows_affected() == 0 {
            return Err(blog_not_found());
        }
        Ok(())
    }
}

pub fn blog_not_found() -> ApiError {
    ApiError::NotFound("Blog not found".to_owned())
}
