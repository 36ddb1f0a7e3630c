pub mod blog_api;
pub mod upload_api;
