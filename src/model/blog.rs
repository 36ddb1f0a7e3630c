use crate::model::validator::{deserialize_id, validate_not_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Serialize, FromRow, Clone, PartialEq)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub blog_image: Option<String>,
    pub date_created: DateTime<Utc>,
    pub content: String,
    pub tag_id: i64,
}

/// Body of both create and update. Updates replace every field, there is no partial form.
#[derive(Debug, Deserialize, Validate)]
pub struct BlogRequest {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 255, message = "can not be longer than 255 characters")
    )]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "can not be longer than 255 characters"))]
    pub blog_image: Option<String>,

    pub content: String,

    #[serde(deserialize_with = "deserialize_id")]
    pub tag_id: i64,
}

impl BlogRequest {
    /// Empty image urls are stored as NULL.
    pub fn image(&self) -> Option<&str> {
        self.blog_image.as_deref().filter(|url| !url.trim().is_empty())
    }
}
