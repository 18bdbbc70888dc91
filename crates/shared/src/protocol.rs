use serde::{Deserialize, Serialize};

use crate::domain::CommentsLimit;

pub const DATA_PATH: &str = "/data";
pub const DELETE_DATA_PATH: &str = "/delete-data";
pub const LOGIN_STATUS_PATH: &str = "/login-status";
pub const BLOBSTORE_UPLOAD_URL_PATH: &str = "/blobstore-upload-url";
pub const RETRIEVE_BLOBSTORE_PATH: &str = "/retrieve-blobstore";
pub const NICKNAME_PATH: &str = "/nickname";

pub const COMMENT_FIELD: &str = "new-comment";
pub const IMAGE_FIELD: &str = "image";
pub const NICKNAME_FIELD: &str = "nickname";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsQuery {
    pub comments_limit: CommentsLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Payload of the comment form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSubmission {
    pub message: String,
    pub image: Option<ImageUpload>,
}

impl CommentSubmission {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }
}
