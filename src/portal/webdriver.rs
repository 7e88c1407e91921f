//! W3C WebDriver wire client.
//!
//! A minimal JSON-over-HTTP client for the handful of endpoints the pipeline
//! needs: session create/delete, navigate, find element, click, clear, send
//! keys, page source, back. Talks to a locally running chromedriver or
//! geckodriver; the browser runs headless.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use url::Url;

use super::{ElementHandle, Locator, PortalError, UiDriver};

/// W3C element identifier key in find-element responses.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

pub struct WebDriverClient {
    http: reqwest::Client,
    base: Url,
    session_id: String,
}

impl WebDriverClient {
    /// Create a headless browser session against a WebDriver endpoint.
    pub async fn connect(webdriver_url: &str) -> Result<Self, PortalError> {
        // A trailing slash keeps Url::join from eating the last path segment
        // on endpoints like Selenium's /wd/hub.
        let base = if webdriver_url.ends_with('/') {
            Url::parse(webdriver_url)?
        } else {
            Url::parse(&format!("{}/", webdriver_url))?
        };

        let http = reqwest::Client::new();
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "goog:chromeOptions": {
                        "args": [
                            "--headless=new",
                            "--disable-gpu",
                            "--no-sandbox",
                            "--disable-dev-shm-usage",
                        ]
                    }
                }
            }
        });

        let resp = http
            .post(base.join("session")?)
            .json(&capabilities)
            .send()
            .await?;
        let status = resp.status();
        let payload: Value = resp
            .json()
            .await
            .map_err(|e| PortalError::SessionFailed(e.to_string()))?;
        let value = &payload["value"];

        if !status.is_success() {
            return Err(PortalError::SessionFailed(
                value["message"]
                    .as_str()
                    .unwrap_or("unknown WebDriver failure")
                    .to_string(),
            ));
        }

        let session_id = value["sessionId"]
            .as_str()
            .ok_or_else(|| {
                PortalError::SessionFailed("response carried no sessionId".to_string())
            })?
            .to_string();

        log::debug!("WebDriver session {} created", session_id);
        Ok(Self {
            http,
            base,
            session_id,
        })
    }

    /// End the browser session. Errors are reported, not raised — teardown
    /// runs on both the success and failure paths.
    pub async fn quit(&self) {
        let path = format!("session/{}", self.session_id);
        if let Err(e) = self.command(Method::DELETE, &path, None).await {
            log::warn!("WebDriver session teardown failed: {}", e);
        }
    }

    /// Issue one wire command and unwrap the W3C `value` envelope.
    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, PortalError> {
        let url = self.base.join(path)?;
        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let payload: Value = resp.json().await.unwrap_or(Value::Null);
        let value = payload.get("value").cloned().unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(PortalError::Wire {
                error: value["error"].as_str().unwrap_or("unknown").to_string(),
                message: value["message"].as_str().unwrap_or_default().to_string(),
            });
        }
        Ok(value)
    }

    fn session_path(&self, suffix: &str) -> String {
        format!("session/{}/{}", self.session_id, suffix)
    }
}

/// Map a locator to the W3C location strategy pair.
fn strategy(locator: &Locator) -> (&'static str, &str) {
    match locator {
        Locator::Css(css) => ("css selector", css),
        Locator::LinkText(text) => ("link text", text),
    }
}

#[async_trait]
impl UiDriver for WebDriverClient {
    async fn goto(&self, url: &str) -> Result<(), PortalError> {
        self.command(
            Method::POST,
            &self.session_path("url"),
            Some(json!({ "url": url })),
        )
        .await?;
        Ok(())
    }

    async fn try_find(&self, locator: &Locator) -> Result<Option<ElementHandle>, PortalError> {
        let (using, value) = strategy(locator);
        let result = self
            .command(
                Method::POST,
                &self.session_path("element"),
                Some(json!({ "using": using, "value": value })),
            )
            .await;

        match result {
            Ok(value) => match value[ELEMENT_KEY].as_str() {
                Some(id) => Ok(Some(ElementHandle(id.to_string()))),
                None => Err(PortalError::Wire {
                    error: "invalid response".to_string(),
                    message: "find-element response carried no element id".to_string(),
                }),
            },
            Err(PortalError::Wire { ref error, .. }) if error == "no such element" => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), PortalError> {
        self.command(
            Method::POST,
            &self.session_path(&format!("element/{}/click", element.0)),
            Some(json!({})),
        )
        .await?;
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), PortalError> {
        self.command(
            Method::POST,
            &self.session_path(&format!("element/{}/clear", element.0)),
            Some(json!({})),
        )
        .await?;
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), PortalError> {
        self.command(
            Method::POST,
            &self.session_path(&format!("element/{}/value", element.0)),
            Some(json!({ "text": text })),
        )
        .await?;
        Ok(())
    }

    async fn page_source(&self) -> Result<String, PortalError> {
        let value = self
            .command(Method::GET, &self.session_path("source"), None)
            .await?;
        value.as_str().map(|s| s.to_string()).ok_or_else(|| {
            PortalError::Wire {
                error: "invalid response".to_string(),
                message: "page source was not a string".to_string(),
            }
        })
    }

    async fn back(&self) -> Result<(), PortalError> {
        self.command(Method::POST, &self.session_path("back"), Some(json!({})))
            .await?;
        Ok(())
    }
}
