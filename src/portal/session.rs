//! Authenticated portal session.
//!
//! The login walk is a fixed state machine over server-rendered pages:
//!
//! `Unauthenticated → LoginFormOpened → CredentialsSubmitted → Authenticated
//! → OnActivityView`
//!
//! Each transition locates one control, activates it, and waits (bounded) for
//! the next page state to settle. A control that never appears is fatal —
//! there is no login retry. The resulting [`ActivityView`] is the single
//! "session ready" witness the extraction engine consumes, one license search
//! at a time.

use async_trait::async_trait;

use crate::config::{Credentials, PortalConfig};

use super::{wait, Locator, PortalError, ResultsSource, UiDriver};

/// Control identifiers on the portal's rendered pages. ASP.NET ids are
/// long-lived but load-bearing: if the portal is reskinned these are the
/// first thing to re-verify.
mod controls {
    pub const OPEN_LOGIN: &str = "ctl00_CabeceraGolf_imgAbrirLogin";
    pub const USERNAME: &str = "ctl00_CabeceraGolf_login_UserName";
    pub const PASSWORD: &str = "ctl00_CabeceraGolf_login_password";
    pub const SUBMIT_LOGIN: &str = "ctl00_CabeceraGolf_login_login";
    pub const PLAYER_AREA_LINK: &str =
        "ctl00_m_g_81dd4ba0_8871_48bd_83e5_76aca2e74970_ctl00_enlaceAJ";
    pub const ACTIVITY_LINK_TEXT: &str = "Ficha de actividad";
    pub const SEARCH_INPUT: &str = "Ficha_Actividad1_TBLicencia";
    pub const SEARCH_BUTTON: &str = "Ficha_Actividad1_BConsLicencia";
    /// Both row stylings mark valid data rows.
    pub const RESULT_ROWS: &str = "tr.item, tr.altern";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthState {
    Unauthenticated,
    LoginFormOpened,
    CredentialsSubmitted,
    Authenticated,
    OnActivityView,
}

/// Drives the login walk and hands out the ready [`ActivityView`].
pub struct Authenticator<'a> {
    driver: &'a dyn UiDriver,
    config: &'a PortalConfig,
    credentials: &'a Credentials,
    state: AuthState,
}

impl<'a> Authenticator<'a> {
    pub fn new(
        driver: &'a dyn UiDriver,
        config: &'a PortalConfig,
        credentials: &'a Credentials,
    ) -> Self {
        Self {
            driver,
            config,
            credentials,
            state: AuthState::Unauthenticated,
        }
    }

    fn transition(&mut self, to: AuthState) {
        log::debug!("portal auth: {:?} → {:?}", self.state, to);
        self.state = to;
    }

    /// Run the full login walk. Consumes the authenticator; on success the
    /// session is parked on the activity view.
    pub async fn login(mut self) -> Result<ActivityView<'a>, PortalError> {
        let settle = &self.config.settle;

        self.driver.goto(&self.config.login_url).await?;
        let open_login = wait::for_element(
            self.driver,
            &Locator::id(controls::OPEN_LOGIN),
            settle.page,
        )
        .await?;
        self.driver.click(&open_login).await?;
        let username_field = wait::for_element(
            self.driver,
            &Locator::id(controls::USERNAME),
            settle.page,
        )
        .await?;
        self.transition(AuthState::LoginFormOpened);

        self.driver
            .send_keys(&username_field, &self.credentials.username)
            .await?;
        let password_field = self.driver.find(&Locator::id(controls::PASSWORD)).await?;
        self.driver
            .send_keys(&password_field, &self.credentials.password)
            .await?;
        let submit = self.driver.find(&Locator::id(controls::SUBMIT_LOGIN)).await?;
        self.driver.click(&submit).await?;
        self.transition(AuthState::CredentialsSubmitted);

        // The player-area link only renders for a logged-in session.
        let player_area = wait::for_element(
            self.driver,
            &Locator::id(controls::PLAYER_AREA_LINK),
            settle.navigation,
        )
        .await?;
        self.transition(AuthState::Authenticated);

        self.driver.click(&player_area).await?;
        let activity_link = wait::for_element(
            self.driver,
            &Locator::LinkText(controls::ACTIVITY_LINK_TEXT.to_string()),
            settle.navigation,
        )
        .await?;
        self.driver.click(&activity_link).await?;
        wait::for_element(
            self.driver,
            &Locator::id(controls::SEARCH_INPUT),
            settle.navigation,
        )
        .await?;
        self.transition(AuthState::OnActivityView);

        log::info!("Portal session authenticated, activity view ready");
        Ok(ActivityView {
            driver: self.driver,
            config: self.config,
        })
    }
}

/// The activity view, post-login. One search/result cycle per call, strictly
/// serial — the underlying session is shared, stateful and single-tabbed.
pub struct ActivityView<'a> {
    driver: &'a dyn UiDriver,
    config: &'a PortalConfig,
}

impl ActivityView<'_> {
    /// Search one license and return the rendered results page.
    ///
    /// Waits for result rows up to the results settle bound; a player with no
    /// recorded activity legitimately renders none, so a quiet timeout falls
    /// through to whatever the page shows. Ends by navigating back so the
    /// next search starts from the same view state.
    async fn search(&self, license: &str) -> Result<String, PortalError> {
        let settle = &self.config.settle;

        let search_input = wait::for_element(
            self.driver,
            &Locator::id(controls::SEARCH_INPUT),
            settle.back,
        )
        .await?;
        self.driver.clear(&search_input).await?;
        self.driver.send_keys(&search_input, license).await?;

        let search_button = self
            .driver
            .find(&Locator::id(controls::SEARCH_BUTTON))
            .await?;
        self.driver.click(&search_button).await?;

        let rows = wait::element_or_timeout(
            self.driver,
            &Locator::Css(controls::RESULT_ROWS.to_string()),
            settle.results,
        )
        .await?;
        if rows.is_none() {
            log::debug!("No result rows rendered for license {}", license);
        }

        let html = self.driver.page_source().await?;
        self.driver.back().await?;
        Ok(html)
    }
}

#[async_trait]
impl ResultsSource for ActivityView<'_> {
    async fn fetch_results_fragment(&self, license: &str) -> Result<String, PortalError> {
        self.search(license).await
    }
}
