use serde::Serialize;

/// Acknowledgement returned by update and delete endpoints.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub url: String,
}
