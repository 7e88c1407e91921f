//! Runtime configuration.
//!
//! Everything is resolved once at startup and passed down as plain structs —
//! no global state. Credentials come from the process environment
//! (`GOLF_USER` / `GOLF_PASSWORD`) and are never written anywhere. Tunables
//! carry conservative defaults matching the portal's observed tolerance.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the portal login user.
pub const ENV_USER: &str = "GOLF_USER";
/// Environment variable holding the portal login password.
pub const ENV_PASSWORD: &str = "GOLF_PASSWORD";
/// Optional override for the WebDriver endpoint.
pub const ENV_WEBDRIVER_URL: &str = "FAIRWAY_WEBDRIVER_URL";
/// Optional override for the data directory.
pub const ENV_DATA_DIR: &str = "FAIRWAY_DATA_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Home directory not found; set FAIRWAY_DATA_DIR explicitly")]
    HomeDirNotFound,

    #[error("Portal credentials missing: set GOLF_USER and GOLF_PASSWORD")]
    MissingCredentials,
}

/// Portal login credentials, environment-supplied.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Fixed settle waits for the portal UI. The portal renders server-side
/// postbacks; each wait is an upper bound polled against a readiness signal,
/// not a blind sleep (see `portal::wait`).
#[derive(Debug, Clone)]
pub struct SettleDelays {
    /// Initial page load and login form open.
    pub page: Duration,
    /// Login round-trip and in-portal navigation.
    pub navigation: Duration,
    /// License search → results table render. The slowest postback by far.
    pub results: Duration,
    /// History-back between players.
    pub back: Duration,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            page: Duration::from_secs(2),
            navigation: Duration::from_secs(3),
            results: Duration::from_secs(10),
            back: Duration::from_secs(5),
        }
    }
}

/// Authenticated extraction pipeline configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Login entry page (the player-area landing page).
    pub login_url: String,
    pub credentials: Option<Credentials>,
    pub settle: SettleDelays,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_url: "https://rfegolf.es/PaginasServicios/areadeljugador.aspx".to_string(),
            credentials: None,
            settle: SettleDelays::default(),
        }
    }
}

/// Club directory crawler configuration.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Base URL for the per-club microsite page.
    pub base_url: String,
    /// Contiguous candidate ID range, inclusive.
    pub id_range: (u32, u32),
    /// Fixed pause between fetches.
    pub request_delay: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://rfegolf.es/ClubPaginas/ClubMicrosite.aspx".to_string(),
            id_range: (1090, 2000),
            request_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `golf.db` and `clubs.db`.
    pub data_dir: PathBuf,
    /// W3C WebDriver endpoint (chromedriver / geckodriver).
    pub webdriver_url: String,
    pub portal: PortalConfig,
    pub directory: DirectoryConfig,
}

impl Config {
    /// Resolve configuration from the environment.
    ///
    /// Credentials are optional here; `require_credentials` gates the
    /// authenticated pipeline so the directory builder and roster import can
    /// run without them.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = match std::env::var(ENV_DATA_DIR) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::home_dir()
                .ok_or(ConfigError::HomeDirNotFound)?
                .join(".fairway"),
        };

        let webdriver_url = std::env::var(ENV_WEBDRIVER_URL)
            .unwrap_or_else(|_| "http://localhost:9515".to_string());

        let credentials = match (std::env::var(ENV_USER), std::env::var(ENV_PASSWORD)) {
            (Ok(username), Ok(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        Ok(Self {
            data_dir,
            webdriver_url,
            portal: PortalConfig {
                credentials,
                ..PortalConfig::default()
            },
            directory: DirectoryConfig::default(),
        })
    }

    /// Credentials, or a config error if the environment did not supply them.
    pub fn require_credentials(&self) -> Result<&Credentials, ConfigError> {
        self.portal
            .credentials
            .as_ref()
            .ok_or(ConfigError::MissingCredentials)
    }

    pub fn golf_db_path(&self) -> PathBuf {
        self.data_dir.join("golf.db")
    }

    pub fn clubs_db_path(&self) -> PathBuf {
        self.data_dir.join("clubs.db")
    }
}
