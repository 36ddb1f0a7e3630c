use crate::errors::ApiResult;
use crate::model::blog::{Blog, BlogRequest};
use crate::model::response::Message;
use crate::model::tag::{Tag, TagCreate, TagName};
use crate::service::blog_service::blog_not_found;
use crate::service::tag_service::tag_not_found;
use crate::util::extractor::{Json, Path, ValidatedJson};
use crate::AppState;
use axum::extract::State;
use axum::routing::{delete, get, post, put};
use axum::Router;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(get_blogs))
        .route("/blog/{id}", get(get_blog))
        .route("/blog/create", post(create_blog))
        .route("/blog/update/{id}", put(update_blog))
        .route("/blog/delete/{id}", delete(delete_blog))
        .route("/tags", get(get_tags))
        .route("/tag/{id}", get(get_tag))
        .route("/tag/create", post(create_tag))
        .route("/tag/delete/{id}", delete(delete_tag))
}

async fn get_blogs(State(state): State<AppState>) -> ApiResult<Json<Vec<Blog>>> {
    let blogs = Blog::get_all(&state.db).await?;
    Ok(Json(blogs))
}

async fn get_blog(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Blog>> {
    let blog = Blog::find_by_id(&state.db, id)
        .await?
        .ok_or_else(blog_not_found)?;
    Ok(Json(blog))
}

async fn create_blog(State(state): State<AppState>, ValidatedJson(blog): ValidatedJson<BlogRequest>) -> ApiResult<Json<Blog>> {
    let blog = Blog::create(&state.db, &blog).await?;
    Ok(Json(blog))
}

async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(blog): ValidatedJson<BlogRequest>,
) -> ApiResult<Json<Message>> {
    Blog::update(&state.db, id, &blog).await?;
    Ok(Json(Message::new("Blog updated successfully!")))
}

async fn delete_blog(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Message>> {
    Blog::delete(&state.db, id).await?;
    Ok(Json(Message::new("Blog deleted successfully!")))
}

async fn get_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<Tag>>> {
    let tags = Tag::get_all(&state.db).await?;
    Ok(Json(tags))
}

async fn get_tag(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<TagName>> {
    let tag = Tag::find_by_id(&state.db, id)
        .await?
        .ok_or_else(tag_not_found)?;
    Ok(Json(TagName::from(tag)))
}

async fn create_tag(State(state): State<AppState>, ValidatedJson(tag): ValidatedJson<TagCreate>) -> ApiResult<Json<Tag>> {
    let tag = Tag::create(&state.db, &tag.name).await?;
    Ok(Json(tag))
}

async fn delete_tag(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Message>> {
    Tag::delete(&state.db, id).await?;
    Ok(Json(Message::new("Tag deleted successfully!")))
}
