use crate::model::validator::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Serialize, FromRow, Clone, PartialEq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TagCreate {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "can not be longer than 100 characters")
    )]
    pub name: String,
}

/// What `GET /api/tag/{id}` answers with.
#[derive(Debug, Serialize)]
pub struct TagName {
    pub name: String,
}

impl From<Tag> for TagName {
    fn from(tag: Tag) -> Self {
        Self { name: tag.name }
    }
}
