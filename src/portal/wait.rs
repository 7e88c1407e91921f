//! Bounded waits against the rendered page.
//!
//! The portal settles via server-side postbacks with no completion event, so
//! every wait is "poll for the readiness signal, give up at the deadline".
//! The timeouts are conservative upper bounds; the poll returns as soon as
//! the signal appears.

use std::time::Duration;

use tokio::time::{sleep, Instant};

use super::{ElementHandle, Locator, PortalError, UiDriver};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Wait until `locator` resolves, failing with [`PortalError::Timeout`] at
/// the deadline. Used where the control is load-bearing: a missing login
/// button or search field is fatal to the run.
pub async fn for_element(
    driver: &dyn UiDriver,
    locator: &Locator,
    timeout: Duration,
) -> Result<ElementHandle, PortalError> {
    match element_or_timeout(driver, locator, timeout).await? {
        Some(element) => Ok(element),
        None => Err(PortalError::Timeout {
            what: locator.to_string(),
            timeout,
        }),
    }
}

/// Wait until `locator` resolves or the deadline passes, returning `None` on
/// timeout. Used where absence is a legal outcome — a player with no recorded
/// results never renders a result row.
pub async fn element_or_timeout(
    driver: &dyn UiDriver,
    locator: &Locator,
    timeout: Duration,
) -> Result<Option<ElementHandle>, PortalError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(element) = driver.try_find(locator).await? {
            return Ok(Some(element));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        sleep(POLL_INTERVAL.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Fake driver whose `try_find` succeeds after a fixed number of polls.
    struct CountdownDriver {
        polls_until_found: AtomicUsize,
    }

    #[async_trait]
    impl UiDriver for CountdownDriver {
        async fn goto(&self, _url: &str) -> Result<(), PortalError> {
            Ok(())
        }

        async fn try_find(
            &self,
            _locator: &Locator,
        ) -> Result<Option<ElementHandle>, PortalError> {
            if self.polls_until_found.fetch_sub(1, Ordering::SeqCst) <= 1 {
                Ok(Some(ElementHandle("el-1".into())))
            } else {
                Ok(None)
            }
        }

        async fn click(&self, _element: &ElementHandle) -> Result<(), PortalError> {
            Ok(())
        }

        async fn clear(&self, _element: &ElementHandle) -> Result<(), PortalError> {
            Ok(())
        }

        async fn send_keys(
            &self,
            _element: &ElementHandle,
            _text: &str,
        ) -> Result<(), PortalError> {
            Ok(())
        }

        async fn page_source(&self) -> Result<String, PortalError> {
            Ok(String::new())
        }

        async fn back(&self) -> Result<(), PortalError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn returns_as_soon_as_the_signal_appears() {
        let driver = CountdownDriver {
            polls_until_found: AtomicUsize::new(3),
        };
        let found = for_element(
            &driver,
            &Locator::Css("tr.item".into()),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(found.0, "el-1");
    }

    #[tokio::test]
    async fn times_out_when_the_signal_never_appears() {
        let driver = CountdownDriver {
            polls_until_found: AtomicUsize::new(usize::MAX),
        };
        let err = for_element(
            &driver,
            &Locator::Css("#missing".into()),
            Duration::from_millis(50),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PortalError::Timeout { .. }));
    }

    #[tokio::test]
    async fn absence_is_not_an_error_for_optional_waits() {
        let driver = CountdownDriver {
            polls_until_found: AtomicUsize::new(usize::MAX),
        };
        let found = element_or_timeout(
            &driver,
            &Locator::Css("tr.item".into()),
            Duration::from_millis(50),
        )
        .await
        .unwrap();
        assert!(found.is_none());
    }
}
