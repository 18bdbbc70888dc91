use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Comment, CommentsLimit, LoginStatus},
    error::ApiError,
    protocol::{
        CommentSubmission, CommentsQuery, BLOBSTORE_UPLOAD_URL_PATH, COMMENT_FIELD, DATA_PATH,
        DELETE_DATA_PATH, IMAGE_FIELD, LOGIN_STATUS_PATH, NICKNAME_FIELD, NICKNAME_PATH,
    },
};
use tracing::debug;
use url::Url;

use crate::error::BackendError;

/// Calls the page makes against its backend.
#[async_trait]
pub trait PortfolioBackend: Send + Sync {
    async fn fetch_name(&self) -> Result<String, BackendError>;
    async fn fetch_comments(&self, limit: CommentsLimit) -> Result<Vec<Comment>, BackendError>;
    async fn delete_all_comments(&self) -> Result<(), BackendError>;
    async fn login_status(&self) -> Result<LoginStatus, BackendError>;
    async fn blobstore_upload_url(&self) -> Result<String, BackendError>;
    async fn submit_comment(
        &self,
        upload_url: &str,
        submission: CommentSubmission,
    ) -> Result<(), BackendError>;
    async fn set_nickname(&self, nickname: &str) -> Result<(), BackendError>;
}

pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url).map_err(|source| BackendError::InvalidUrl {
            raw: base_url.to_string(),
            source,
        })?;
        Ok(Self { http, base_url })
    }

    /// Resolve a root-relative path or an absolute URL against the base URL.
    pub fn resolve(&self, raw: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(raw)
            .map_err(|source| BackendError::InvalidUrl {
                raw: raw.to_string(),
                source,
            })
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Response, BackendError> {
        debug!(path, "sending backend request");
        request.send().await.map_err(|source| BackendError::Request {
            path: path.to_string(),
            source,
        })
    }

    async fn send_checked(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Response, BackendError> {
        let response = self.send(path, request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            path: path.to_string(),
            source: ApiError::new(status.as_u16(), message.trim()),
        })
    }

    async fn read_text(&self, path: &str, response: Response) -> Result<String, BackendError> {
        response.text().await.map_err(|source| BackendError::Request {
            path: path.to_string(),
            source,
        })
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        path: &str,
        response: Response,
    ) -> Result<T, BackendError> {
        let body = self.read_text(path, response).await?;
        serde_json::from_str(&body).map_err(|source| BackendError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PortfolioBackend for HttpBackend {
    async fn fetch_name(&self) -> Result<String, BackendError> {
        let url = self.resolve(DATA_PATH)?;
        let response = self.send_checked(DATA_PATH, self.http.get(url)).await?;
        self.read_text(DATA_PATH, response).await
    }

    async fn fetch_comments(&self, limit: CommentsLimit) -> Result<Vec<Comment>, BackendError> {
        let url = self.resolve(DATA_PATH)?;
        let request = self.http.get(url).query(&CommentsQuery {
            comments_limit: limit,
        });
        let response = self.send(DATA_PATH, request).await?;
        match response.status() {
            StatusCode::OK => self.read_json(DATA_PATH, response).await,
            StatusCode::BAD_REQUEST => Err(BackendError::InvalidRange),
            status => Err(BackendError::CommentsUnavailable {
                status: status.as_u16(),
            }),
        }
    }

    async fn delete_all_comments(&self) -> Result<(), BackendError> {
        let url = self.resolve(DELETE_DATA_PATH)?;
        self.send_checked(DELETE_DATA_PATH, self.http.post(url))
            .await?;
        Ok(())
    }

    async fn login_status(&self) -> Result<LoginStatus, BackendError> {
        let url = self.resolve(LOGIN_STATUS_PATH)?;
        let response = self
            .send_checked(LOGIN_STATUS_PATH, self.http.get(url))
            .await?;
        self.read_json(LOGIN_STATUS_PATH, response).await
    }

    async fn blobstore_upload_url(&self) -> Result<String, BackendError> {
        let url = self.resolve(BLOBSTORE_UPLOAD_URL_PATH)?;
        let response = self
            .send_checked(BLOBSTORE_UPLOAD_URL_PATH, self.http.get(url))
            .await?;
        let upload_url = self.read_text(BLOBSTORE_UPLOAD_URL_PATH, response).await?;
        Ok(upload_url.trim().to_string())
    }

    async fn submit_comment(
        &self,
        upload_url: &str,
        submission: CommentSubmission,
    ) -> Result<(), BackendError> {
        let url = self.resolve(upload_url)?;
        let mut form = multipart::Form::new().text(COMMENT_FIELD, submission.message);
        if let Some(image) = submission.image {
            let mime_type = image
                .mime_type
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let part = multipart::Part::bytes(image.bytes)
                .file_name(image.filename)
                .mime_str(&mime_type)
                .map_err(|source| BackendError::Request {
                    path: upload_url.to_string(),
                    source,
                })?;
            form = form.part(IMAGE_FIELD, part);
        }
        self.send_checked(upload_url, self.http.post(url).multipart(form))
            .await?;
        Ok(())
    }

    async fn set_nickname(&self, nickname: &str) -> Result<(), BackendError> {
        let url = self.resolve(NICKNAME_PATH)?;
        self.send_checked(
            NICKNAME_PATH,
            self.http.post(url).form(&[(NICKNAME_FIELD, nickname)]),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_and_absolute_urls() {
        let backend = HttpBackend::new("http://127.0.0.1:8080").expect("backend");
        assert_eq!(
            backend.resolve("/data").expect("relative").as_str(),
            "http://127.0.0.1:8080/data"
        );
        assert_eq!(
            backend
                .resolve("https://uploads.example.com/_ah/upload/abc")
                .expect("absolute")
                .as_str(),
            "https://uploads.example.com/_ah/upload/abc"
        );
    }

    #[test]
    fn rejects_unparsable_base_url() {
        let err = HttpBackend::new("not a url").err().expect("invalid base");
        assert!(matches!(err, BackendError::InvalidUrl { .. }));
    }
}
