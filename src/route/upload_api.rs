use crate::errors::{bad_request, ApiResult};
use crate::model::response::FileInfo;
use crate::util::extractor::Json;
use crate::util::file::{generate_secure_filename, FALLBACK_FILENAME};
use crate::AppState;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::Router;
use futures_util::TryStreamExt;
use std::io;
use tokio_util::io::StreamReader;

const FILE_FIELD: &str = "file";

pub fn create_routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_file))
}

async fn upload_file(State(state): State<AppState>, mut multipart: Multipart) -> ApiResult<Json<FileInfo>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = generate_secure_filename(field.file_name().unwrap_or(FALLBACK_FILENAME), 16);
        let content_type = field.content_type().map(str::to_owned);

        // Convert the stream into an `AsyncRead`.
        let body_with_io_error = field.map_err(io::Error::other);
        let body_reader = StreamReader::new(body_with_io_error);
        futures::pin_mut!(body_reader);

        let url = state
            .uploader
            .upload(body_reader, &filename, content_type.as_deref())
            .await?;

        return Ok(Json(FileInfo { url }));
    }

    Err(bad_request("Missing multipart field 'file'"))
}
