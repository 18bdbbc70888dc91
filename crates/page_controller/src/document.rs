//! In-memory view model of the portfolio page.
//!
//! Operations mutate a [`Document`] instead of a live DOM; [`crate::render`]
//! projects it to markup.

use std::collections::BTreeMap;

use shared::{
    domain::{BlobKey, CommentsLimit},
    protocol::{COMMENT_FIELD, IMAGE_FIELD, NICKNAME_PATH},
};

use crate::error::PageError;

/// Element ids the page markup has to provide.
pub mod ids {
    pub const RANDOM_QUOTE_CONTAINER: &str = "random-quote-container";
    pub const RANDOM_IMAGE_CONTAINER: &str = "random-image-container";
    pub const NAME_CONTAINER: &str = "name-container";
    pub const COMMENTS_HISTORY: &str = "comments-history";
    pub const COMMENTS_LIMIT: &str = "commentsLimit";
    pub const COMMENT_FORM: &str = "commentForm";
    pub const LOGIN_LINK: &str = "loginLink";
    pub const LOGOUT_LINK: &str = "logoutLink";
    pub const CHANGE_NICKNAME_LINK: &str = "changeNicknameLink";

    /// Regions hidden until the login status is known.
    pub const LOGIN_GATED: [&str; 4] = [COMMENT_FORM, LOGIN_LINK, LOGOUT_LINK, CHANGE_NICKNAME_LINK];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Div,
    Ul,
    Li,
    Img,
    A,
    Form,
    Input,
    Textarea,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Ul => "ul",
            Self::Li => "li",
            Self::Img => "img",
            Self::A => "a",
            Self::Form => "form",
            Self::Input => "input",
            Self::Textarea => "textarea",
        }
    }

    pub fn is_void(self) -> bool {
        matches!(self, Self::Img | Self::Input)
    }
}

/// Inline display state. `Inherit` leaves it to the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Inherit,
    Block,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    pub id: Option<String>,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    pub display: Display,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            id: None,
            text: String::new(),
            attributes: BTreeMap::new(),
            display: Display::Inherit,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn is_visible(&self) -> bool {
        self.display != Display::None
    }

    fn find(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }
}

pub fn create_list_element(text: &str) -> Element {
    Element::new(Tag::Li).with_text(text)
}

/// Image pointing at the blobstore retrieval endpoint, or `None` for an absent or empty key.
pub fn create_image_element(key: Option<&str>) -> Option<Element> {
    let key = key.filter(|key| !key.is_empty())?;
    Some(Element::new(Tag::Img).with_attr("src", BlobKey::new(key).retrieval_url()))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    roots: Vec<Element>,
    alerts: Vec<String>,
}

impl Document {
    pub fn new(roots: Vec<Element>) -> Self {
        Self {
            roots,
            alerts: Vec::new(),
        }
    }

    /// Markup skeleton of the portfolio page.
    pub fn portfolio_page(default_comments_limit: i64) -> Self {
        let comment_form = Element::new(Tag::Form)
            .with_id(ids::COMMENT_FORM)
            .with_attr("method", "POST")
            .with_attr("enctype", "multipart/form-data")
            .with_child(Element::new(Tag::Textarea).with_attr("name", COMMENT_FIELD))
            .with_child(
                Element::new(Tag::Input)
                    .with_attr("type", "file")
                    .with_attr("name", IMAGE_FIELD),
            )
            .with_child(Element::new(Tag::Input).with_attr("type", "submit"));

        Self::new(vec![
            Element::new(Tag::Div).with_id(ids::RANDOM_QUOTE_CONTAINER),
            Element::new(Tag::Div).with_id(ids::RANDOM_IMAGE_CONTAINER),
            Element::new(Tag::Div).with_id(ids::NAME_CONTAINER),
            Element::new(Tag::A)
                .with_id(ids::LOGIN_LINK)
                .with_text("Login"),
            Element::new(Tag::A)
                .with_id(ids::LOGOUT_LINK)
                .with_text("Logout"),
            Element::new(Tag::A)
                .with_id(ids::CHANGE_NICKNAME_LINK)
                .with_attr("href", NICKNAME_PATH)
                .with_text("Change nickname"),
            comment_form,
            Element::new(Tag::Input)
                .with_id(ids::COMMENTS_LIMIT)
                .with_attr("type", "number")
                .with_attr("min", CommentsLimit::MIN.to_string())
                .with_attr("max", CommentsLimit::MAX.to_string())
                .with_attr("value", default_comments_limit.to_string()),
            Element::new(Tag::Ul).with_id(ids::COMMENTS_HISTORY),
        ])
    }

    pub fn roots(&self) -> &[Element] {
        &self.roots
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    pub fn element_mut(&mut self, id: &str) -> Result<&mut Element, PageError> {
        self.roots
            .iter_mut()
            .find_map(|root| root.find_mut(id))
            .ok_or_else(|| PageError::MissingElement(id.to_string()))
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> Result<(), PageError> {
        let element = self.element_mut(id)?;
        element.text = text.into();
        element.children.clear();
        Ok(())
    }

    pub fn replace_children(&mut self, id: &str, children: Vec<Element>) -> Result<(), PageError> {
        self.element_mut(id)?.children = children;
        Ok(())
    }

    pub fn display_element(&mut self, id: &str, shown: bool) -> Result<(), PageError> {
        self.element_mut(id)?.display = if shown { Display::Block } else { Display::None };
        Ok(())
    }

    pub fn update_link(&mut self, id: &str, href: &str) -> Result<(), PageError> {
        self.element_mut(id)?.set_attr("href", href);
        Ok(())
    }

    pub fn input_value(&self, id: &str) -> Result<String, PageError> {
        self.element(id)
            .map(|element| element.attr("value").unwrap_or_default().to_string())
            .ok_or_else(|| PageError::MissingElement(id.to_string()))
    }

    pub fn set_input_value(&mut self, id: &str, value: impl Into<String>) -> Result<(), PageError> {
        self.element_mut(id)?.set_attr("value", value);
        Ok(())
    }
}
