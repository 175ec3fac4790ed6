use serde::Serialize;
use serde_json::Value;

/// Body of the posts endpoint. Its shape belongs to the server.
pub type PostsResponse = Value;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub property_id: Option<u64>,
    pub image_id: Option<u64>,
    pub url: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum ImageStatus {
    Ok(u16),
    NotFound,
    HttpError(u16),
    RequestFailed(String),
}

impl ImageStatus {
    pub fn is_broken(&self) -> bool {
        !matches!(self, ImageStatus::Ok(_))
    }
}
