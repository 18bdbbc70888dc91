use std::sync::atomic::{AtomicU64, Ordering};

use shared::{
    domain::{image_path, CommentsLimit, LoginStatus, IMAGE_COUNT, QUOTES},
    protocol::CommentSubmission,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub mod backend;
pub mod document;
pub mod error;
pub mod picker;
pub mod render;

pub use backend::{HttpBackend, PortfolioBackend};
pub use document::{create_image_element, create_list_element, ids, Display, Document, Element, Tag};
pub use error::{BackendError, PageError};
pub use picker::{Picker, SeededPicker, ThreadRngPicker};
pub use render::render_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentsOutcome {
    Rendered { count: usize },
    /// A newer comments request started before this one finished; nothing was rendered.
    Superseded,
}

/// User-triggered or load-triggered work on the page.
#[derive(Debug, Clone)]
pub enum PageAction {
    LoadPage,
    ShowRandomQuote,
    RandomizeImage,
    GetRandomName,
    GetComments,
    DeleteAllComments,
    UpdateVisibilityForLoginStatus,
    SubmitComment(CommentSubmission),
    SetNickname(String),
}

impl PageAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadPage => "load_page",
            Self::ShowRandomQuote => "show_random_quote",
            Self::RandomizeImage => "randomize_image",
            Self::GetRandomName => "get_random_name",
            Self::GetComments => "get_comments",
            Self::DeleteAllComments => "delete_all_comments",
            Self::UpdateVisibilityForLoginStatus => "update_visibility_for_login_status",
            Self::SubmitComment(_) => "submit_comment",
            Self::SetNickname(_) => "set_nickname",
        }
    }
}

pub struct PageController<B: PortfolioBackend> {
    backend: B,
    picker: Box<dyn Picker>,
    document: Mutex<Document>,
    comments_generation: AtomicU64,
}

impl<B: PortfolioBackend> PageController<B> {
    pub fn new(backend: B, document: Document) -> Self {
        Self {
            backend,
            picker: Box::new(ThreadRngPicker),
            document: Mutex::new(document),
            comments_generation: AtomicU64::new(0),
        }
    }

    pub fn with_picker(mut self, picker: impl Picker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    pub async fn snapshot(&self) -> Document {
        self.document.lock().await.clone()
    }

    pub async fn render_html(&self) -> String {
        render_html(&*self.document.lock().await)
    }

    pub async fn take_alerts(&self) -> Vec<String> {
        self.document.lock().await.take_alerts()
    }

    pub async fn set_comments_limit_input(&self, value: &str) -> Result<(), PageError> {
        self.document
            .lock()
            .await
            .set_input_value(ids::COMMENTS_LIMIT, value)
    }

    /// Run an action and present any failure as an alert on the page.
    pub async fn dispatch(&self, action: PageAction) -> Result<(), PageError> {
        let name = action.name();
        debug!(action = name, "dispatching page action");
        let result = match action {
            PageAction::LoadPage => self.load_page().await,
            PageAction::ShowRandomQuote => self.show_random_quote().await.map(|_| ()),
            PageAction::RandomizeImage => self.randomize_image().await.map(|_| ()),
            PageAction::GetRandomName => self.get_random_name().await.map(|_| ()),
            PageAction::GetComments => self.get_comments().await.map(|_| ()),
            PageAction::DeleteAllComments => self.delete_all_comments().await.map(|_| ()),
            PageAction::UpdateVisibilityForLoginStatus => self
                .update_visibility_for_login_status()
                .await
                .map(|_| ()),
            PageAction::SubmitComment(submission) => {
                self.submit_comment(submission).await.map(|_| ())
            }
            PageAction::SetNickname(nickname) => self.set_nickname(&nickname).await,
        };

        if let Err(error) = &result {
            warn!(action = name, %error, "page action failed");
            self.document.lock().await.alert(error.to_string());
        }
        result
    }

    /// Quote, image, login-gated regions, then comments. Stops at the first failure.
    pub async fn load_page(&self) -> Result<(), PageError> {
        self.show_random_quote().await?;
        self.randomize_image().await?;
        self.update_visibility_for_login_status().await?;
        self.get_comments().await?;
        Ok(())
    }

    pub async fn show_random_quote(&self) -> Result<&'static str, PageError> {
        let quote = QUOTES[self.picker.pick_index(QUOTES.len())];
        self.document
            .lock()
            .await
            .set_text(ids::RANDOM_QUOTE_CONTAINER, quote)?;
        Ok(quote)
    }

    pub async fn randomize_image(&self) -> Result<String, PageError> {
        let index = self.picker.pick_index(IMAGE_COUNT as usize) as u32 + 1;
        let path = image_path(index);
        let image = Element::new(Tag::Img).with_attr("src", path.as_str());
        self.document
            .lock()
            .await
            .replace_children(ids::RANDOM_IMAGE_CONTAINER, vec![image])?;
        Ok(path)
    }

    pub async fn get_random_name(&self) -> Result<String, PageError> {
        let name = self.backend.fetch_name().await?;
        self.document
            .lock()
            .await
            .set_text(ids::NAME_CONTAINER, name.as_str())?;
        Ok(name)
    }

    /// Fetch comments using the limit typed into the page's limit input.
    pub async fn get_comments(&self) -> Result<CommentsOutcome, PageError> {
        let raw = self.document.lock().await.input_value(ids::COMMENTS_LIMIT)?;
        let limit = CommentsLimit::parse(&raw).ok_or(PageError::InvalidLimitInput(raw))?;
        self.get_comments_with_limit(limit).await
    }

    pub async fn get_comments_with_limit(
        &self,
        limit: CommentsLimit,
    ) -> Result<CommentsOutcome, PageError> {
        let ticket = self.comments_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let fetched = self.backend.fetch_comments(limit).await;

        let mut document = self.document.lock().await;
        if self.comments_generation.load(Ordering::SeqCst) != ticket {
            debug!(ticket, %limit, "dropping superseded comments response");
            return Ok(CommentsOutcome::Superseded);
        }

        let comments = fetched?;
        let items = comments
            .iter()
            .map(|comment| {
                let mut item = create_list_element(&comment.display_text());
                item.children
                    .extend(create_image_element(comment.image_key().map(|key| key.0.as_str())));
                item
            })
            .collect::<Vec<_>>();
        let count = items.len();
        document.replace_children(ids::COMMENTS_HISTORY, items)?;
        info!(count, %limit, "rendered comments");
        Ok(CommentsOutcome::Rendered { count })
    }

    /// Delete every comment, then refresh the list even if the delete failed.
    pub async fn delete_all_comments(&self) -> Result<CommentsOutcome, PageError> {
        let deleted = self.backend.delete_all_comments().await;
        if let Err(error) = &deleted {
            warn!(%error, "deleting comments failed; refreshing anyway");
        }
        let refreshed = self.get_comments().await;
        deleted?;
        refreshed
    }

    pub async fn update_visibility_for_login_status(&self) -> Result<LoginStatus, PageError> {
        {
            let mut document = self.document.lock().await;
            for id in ids::LOGIN_GATED {
                document.display_element(id, false)?;
            }
        }

        let status = self.backend.login_status().await?;
        if status.is_logged_in {
            {
                let mut document = self.document.lock().await;
                document.display_element(ids::COMMENT_FORM, true)?;
                document.display_element(ids::LOGOUT_LINK, true)?;
                document.display_element(ids::CHANGE_NICKNAME_LINK, true)?;
                if let Some(logout_link) = &status.logout_link {
                    document.update_link(ids::LOGOUT_LINK, logout_link)?;
                }
            }
            self.refresh_upload_url().await?;
        } else {
            let mut document = self.document.lock().await;
            document.display_element(ids::LOGIN_LINK, true)?;
            if let Some(login_link) = &status.login_link {
                document.update_link(ids::LOGIN_LINK, login_link)?;
            }
        }

        info!(logged_in = status.is_logged_in, "updated login-gated regions");
        Ok(status)
    }

    /// Post the comment form to its upload target, then refresh the list.
    pub async fn submit_comment(
        &self,
        submission: CommentSubmission,
    ) -> Result<CommentsOutcome, PageError> {
        let action = self
            .document
            .lock()
            .await
            .element(ids::COMMENT_FORM)
            .ok_or_else(|| PageError::MissingElement(ids::COMMENT_FORM.to_string()))?
            .attr("action")
            .filter(|action| !action.is_empty())
            .map(str::to_string);
        let upload_url = match action {
            Some(upload_url) => upload_url,
            None => self.refresh_upload_url().await?,
        };

        let has_image = submission.image.is_some();
        self.backend.submit_comment(&upload_url, submission).await?;
        info!(has_image, "submitted comment");
        self.get_comments().await
    }

    pub async fn set_nickname(&self, nickname: &str) -> Result<(), PageError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(PageError::EmptyNickname);
        }
        self.backend.set_nickname(nickname).await?;
        Ok(())
    }

    async fn refresh_upload_url(&self) -> Result<String, PageError> {
        let upload_url = self.backend.blobstore_upload_url().await?;
        self.document
            .lock()
            .await
            .element_mut(ids::COMMENT_FORM)?
            .set_attr("action", upload_url.as_str());
        Ok(upload_url)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
