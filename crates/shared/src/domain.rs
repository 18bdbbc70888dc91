use std::fmt;

use serde::{Deserialize, Serialize};

pub const QUOTES: [&str; 3] = [
    "One day, one lifetime",
    "The moment you say “I know everything” is the end of your growth",
    "Shoot for the moon. Even if you miss it you will land among the stars",
];

/// Number of images shipped under `images/`, named `img1.jpeg` onwards.
pub const IMAGE_COUNT: u32 = 2;

pub fn image_path(index: u32) -> String {
    format!("images/img{index}.jpeg")
}

/// Opaque identifier of an image stored in the blobstore.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobKey(pub String);

impl BlobKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Relative URL that serves the blob's content.
    pub fn retrieval_url(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("blob", &self.0)
            .finish();
        format!("{}?{query}", crate::protocol::RETRIEVE_BLOBSTORE_PATH)
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub message: String,
    /// Sentiment in `[-1.0, 1.0]`.
    #[serde(default)]
    pub score: f64,
    pub user_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_blobstore_key: Option<BlobKey>,
}

impl Comment {
    /// Text shown for the comment: `<message>(<score>): <userData>`.
    pub fn display_text(&self) -> String {
        format!("{}({}): {}", self.message, self.score, self.user_data)
    }

    /// Attached image key, if it is present and non-empty.
    pub fn image_key(&self) -> Option<&BlobKey> {
        self.image_blobstore_key
            .as_ref()
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatus {
    pub is_logged_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logout_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Maximum number of comments to fetch. The backend owns the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentsLimit(pub i64);

impl CommentsLimit {
    /// Range the backend accepts; out-of-range values come back as HTTP 400.
    pub const MIN: i64 = 0;
    pub const MAX: i64 = 100;

    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().map(Self)
    }
}

impl fmt::Display for CommentsLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_display_uses_shortest_score_form() {
        let mut comment = Comment {
            message: "hi".into(),
            score: 1.0,
            user_data: "a@x.com".into(),
            image_blobstore_key: None,
        };
        assert_eq!(comment.display_text(), "hi(1): a@x.com");

        comment.score = -0.25;
        assert_eq!(comment.display_text(), "hi(-0.25): a@x.com");
    }

    #[test]
    fn comment_decodes_camel_case_with_null_key() {
        let comment: Comment = serde_json::from_str(
            r#"{"message":"hi","score":1,"userData":"a@x.com","imageBlobstoreKey":null}"#,
        )
        .expect("decode");
        assert_eq!(comment.user_data, "a@x.com");
        assert!(comment.image_key().is_none());
    }

    #[test]
    fn empty_blob_key_counts_as_no_image() {
        let comment: Comment = serde_json::from_str(
            r#"{"message":"m","score":0.5,"userData":"u","imageBlobstoreKey":""}"#,
        )
        .expect("decode");
        assert!(comment.image_key().is_none());
    }

    #[test]
    fn retrieval_url_encodes_key() {
        assert_eq!(
            BlobKey::new("abc").retrieval_url(),
            "/retrieve-blobstore?blob=abc"
        );
        assert_eq!(
            BlobKey::new("a b&c").retrieval_url(),
            "/retrieve-blobstore?blob=a+b%26c"
        );
    }

    #[test]
    fn login_status_tolerates_missing_links() {
        let status: LoginStatus =
            serde_json::from_str(r#"{"isLoggedIn":false,"loginLink":"/_ah/login"}"#)
                .expect("decode");
        assert!(!status.is_logged_in);
        assert_eq!(status.login_link.as_deref(), Some("/_ah/login"));
        assert!(status.logout_link.is_none());
    }

    #[test]
    fn comments_limit_parses_trimmed_integers_only() {
        assert_eq!(CommentsLimit::parse(" 5 "), Some(CommentsLimit(5)));
        assert_eq!(CommentsLimit::parse("five"), None);
        assert_eq!(CommentsLimit::parse(""), None);
    }
}
