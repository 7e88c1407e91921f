//! Portal transport and session handling.
//!
//! The extraction pipeline drives the federation portal through a rendered,
//! session-bound UI — there is no API. The DOM-level primitives live behind
//! the [`UiDriver`] trait so the session machine and the extraction engine
//! never touch the wire protocol directly; the production implementation is a
//! thin W3C WebDriver client ([`webdriver::WebDriverClient`]), tests use
//! in-memory fakes.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod session;
pub mod wait;
pub mod webdriver;

pub use session::{ActivityView, Authenticator};
pub use webdriver::WebDriverClient;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("WebDriver request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid WebDriver URL: {0}")]
    BadUrl(#[from] url::ParseError),

    #[error("WebDriver session could not be created: {0}")]
    SessionFailed(String),

    #[error("WebDriver protocol error ({error}): {message}")]
    Wire { error: String, message: String },

    #[error("Expected control not found: {0}")]
    ControlNotFound(String),

    #[error("Timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },
}

/// How to locate a control on the rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    LinkText(String),
}

impl Locator {
    /// Locate an element by its DOM id.
    pub fn id(id: &str) -> Self {
        Locator::Css(format!("#{}", id))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(css) => write!(f, "css {:?}", css),
            Locator::LinkText(text) => write!(f, "link {:?}", text),
        }
    }
}

/// Opaque handle to a located element, valid for the current page render.
#[derive(Debug, Clone)]
pub struct ElementHandle(pub String);

/// DOM-level primitives the session machine and extraction engine depend on.
///
/// Deliberately small: navigate, locate, activate, type, read. Everything the
/// pipeline knows about the portal is expressed through these seven calls.
#[async_trait]
pub trait UiDriver: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), PortalError>;

    /// Locate a control; `Ok(None)` when the page has no match.
    async fn try_find(&self, locator: &Locator) -> Result<Option<ElementHandle>, PortalError>;

    async fn click(&self, element: &ElementHandle) -> Result<(), PortalError>;

    async fn clear(&self, element: &ElementHandle) -> Result<(), PortalError>;

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), PortalError>;

    /// Current rendered page as HTML.
    async fn page_source(&self) -> Result<String, PortalError>;

    /// History-back navigation.
    async fn back(&self) -> Result<(), PortalError>;

    /// Locate a control that must exist right now.
    async fn find(&self, locator: &Locator) -> Result<ElementHandle, PortalError> {
        self.try_find(locator)
            .await?
            .ok_or_else(|| PortalError::ControlNotFound(locator.to_string()))
    }
}

/// The extraction engine's view of the portal: one license search, one
/// rendered results fragment. Implemented by [`session::ActivityView`] in
/// production and by fixtures in tests.
#[async_trait]
pub trait ResultsSource: Send + Sync {
    async fn fetch_results_fragment(&self, license: &str) -> Result<String, PortalError>;
}
