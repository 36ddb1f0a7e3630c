#[cfg(test)]
mod tests {
    use crate::tests::common::test_db;
    use blogo::errors::ApiError;
    use blogo::model::blog::{Blog, BlogRequest};
    use blogo::model::tag::Tag;
    use serde_json::json;

    fn request(title: &str, tag_id: i64) -> BlogRequest {
        serde_json::from_value(json!({
            "title": title,
            "description": format!("about {}", title),
            "content": format!("{} content", title),
            "blog_image": "https://firebasestorage.googleapis.com/v0/b/x/o/uploads%2Fa.png?alt=media",
            "tag_id": tag_id,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_is_empty_without_rows() {
        let db = test_db().await;
        assert!(Blog::get_all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_created_blog_matches_stored_row() {
        let db = test_db().await;
        let tag = Tag::create(&db, "travel").await.unwrap();

        let created = Blog::create(&db, &request("Trip", tag.id)).await.unwrap();
        assert_eq!(created.title, "Trip");
        assert_eq!(created.description, "about Trip");
        assert_eq!(created.content, "Trip content");
        assert_eq!(created.tag_id, tag.id);
        assert!(created.blog_image.is_some());

        let found = Blog::find_by_id(&db, created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let db = test_db().await;
        let tag = Tag::create(&db, "travel").await.unwrap();

        let first = Blog::create(&db, &request("First", tag.id)).await.unwrap();
        let second = Blog::create(&db, &request("Second", tag.id)).await.unwrap();

        assert_eq!(Blog::get_all(&db).await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_create_with_unknown_tag_inserts_nothing() {
        let db = test_db().await;

        let rv = Blog::create(&db, &request("Orphan", 99)).await;
        match rv {
            Err(ApiError::Sqlx(sqlx::Error::Database(e))) => {
                assert!(e.is_foreign_key_violation());
            }
            other => panic!("expected a foreign key violation, got {:?}", other),
        }

        assert!(Blog::get_all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_but_not_date() {
        let db = test_db().await;
        let travel = Tag::create(&db, "travel").await.unwrap();
        let food = Tag::create(&db, "food").await.unwrap();
        let created = Blog::create(&db, &request("Trip", travel.id)).await.unwrap();

        let update: BlogRequest = serde_json::from_value(json!({
            "title": "Dinner",
            "content": "pasta",
            "tag_id": food.id.to_string(),
        }))
        .unwrap();
        Blog::update(&db, created.id, &update).await.unwrap();

        let updated = Blog::find_by_id(&db, created.id).await.unwrap().unwrap();
        assert_eq!(updated.title, "Dinner");
        assert_eq!(updated.description, "");
        assert_eq!(updated.content, "pasta");
        assert_eq!(updated.blog_image, None);
        assert_eq!(updated.tag_id, food.id);
        assert_eq!(updated.date_created, created.date_created);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = test_db().await;
        let tag = Tag::create(&db, "travel").await.unwrap();
        let created = Blog::create(&db, &request("Trip", tag.id)).await.unwrap();

        let rv = Blog::update(&db, created.id + 1, &request("Ghost", tag.id)).await;
        assert!(matches!(rv, Err(ApiError::NotFound(_))));

        assert_eq!(Blog::get_all(&db).await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let tag = Tag::create(&db, "travel").await.unwrap();
        let keep = Blog::create(&db, &request("Keep", tag.id)).await.unwrap();
        let dropped = Blog::create(&db, &request("Drop", tag.id)).await.unwrap();

        Blog::delete(&db, dropped.id).await.unwrap();
        assert_eq!(Blog::find_by_id(&db, dropped.id).await.unwrap(), None);

        let rv = Blog::delete(&db, dropped.id).await;
        assert!(matches!(rv, Err(ApiError::NotFound(_))));

        assert_eq!(Blog::get_all(&db).await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn test_deleting_tag_cascades_to_its_blogs() {
        let db = test_db().await;
        let travel = Tag::create(&db, "travel").await.unwrap();
        let food = Tag::create(&db, "food").await.unwrap();

        let mut doomed = Vec::new();
        for i in 0..3 {
            doomed.push(Blog::create(&db, &request(&format!("Trip {}", i), travel.id)).await.unwrap());
        }
        let survivor = Blog::create(&db, &request("Dinner", food.id)).await.unwrap();

        Tag::delete(&db, travel.id).await.unwrap();

        for blog in doomed {
            assert_eq!(Blog::find_by_id(&db, blog.id).await.unwrap(), None);
        }
        assert_eq!(Blog::get_all(&db).await.unwrap(), vec![survivor]);
    }
}
