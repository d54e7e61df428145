use std::fmt;
use std::time::Duration;

use url::Url;

use crate::endpoints::GatewayEndpoint;
use crate::error::{Error, Result};

pub const DEFAULT_DTD_VERSION: &str = "3.0";
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Sender and user credentials for the Intacct XML gateway.
///
/// The sender pair identifies the integrating application (Web Services
/// sender id); the user triple identifies the company login.
#[derive(Clone)]
pub struct Credentials {
    pub sender_id: String,
    pub sender_password: String,
    pub company_id: String,
    pub user_id: String,
    pub user_password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(
        sender_id: impl Into<String>,
        sender_password: impl Into<String>,
        company_id: impl Into<String>,
        user_id: impl Into<String>,
        user_password: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            sender_password: sender_password.into(),
            company_id: company_id.into(),
            user_id: user_id.into(),
            user_password: user_password.into(),
        }
    }

    /// The same sender, logging in as a different company user.
    #[must_use]
    pub fn with_user(
        &self,
        company_id: impl Into<String>,
        user_id: impl Into<String>,
        user_password: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: self.sender_id.clone(),
            sender_password: self.sender_password.clone(),
            company_id: company_id.into(),
            user_id: user_id.into(),
            user_password: user_password.into(),
        }
    }

    /// Reads `INTACCT_SENDER_ID`, `INTACCT_SENDER_PASSWORD`, `INTACCT_COMPANY_ID`,
    /// `INTACCT_USER_ID` and `INTACCT_USER_PASSWORD`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            sender_id: env_var("INTACCT_SENDER_ID")?,
            sender_password: env_var("INTACCT_SENDER_PASSWORD")?,
            company_id: env_var("INTACCT_COMPANY_ID")?,
            user_id: env_var("INTACCT_USER_ID")?,
            user_password: env_var("INTACCT_USER_PASSWORD")?,
        })
    }
}

// passwords stay out of logs and spans
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("sender_id", &self.sender_id)
            .field("sender_password", &"[redacted]")
            .field("company_id", &self.company_id)
            .field("user_id", &self.user_id)
            .field("user_password", &"[redacted]")
            .finish()
    }
}

fn env_var(variable: &str) -> Result<String> {
    std::env::var(variable).map_err(|_| Error::Config {
        variable: variable.to_string(),
    })
}

/// Client configuration, built once and shared by every request.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub endpoint: GatewayEndpoint,
    pub dtd_version: String,
    pub page_size: u32,
    /// Send session requests to the endpoint returned by `getAPISession`
    /// rather than the configured one.
    pub use_session_endpoint: bool,
    pub timeout: Option<Duration>,
}

impl Config {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: GatewayEndpoint::Default,
            dtd_version: DEFAULT_DTD_VERSION.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            use_session_endpoint: true,
            timeout: None,
        }
    }

    /// Credentials from the environment, plus an optional `INTACCT_ENDPOINT` override.
    pub fn from_env() -> Result<Self> {
        let config = Self::new(Credentials::from_env()?);
        match std::env::var("INTACCT_ENDPOINT") {
            Ok(endpoint) => config.with_endpoint_str(&endpoint),
            Err(_) => Ok(config),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = GatewayEndpoint::Custom(endpoint);
        self
    }

    pub fn with_endpoint_str(self, endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint).map_err(|_| Error::InvalidEndpoint)?;
        Ok(self.with_endpoint(url))
    }

    #[must_use]
    pub fn with_dtd_version(mut self, dtd_version: impl Into<String>) -> Self {
        self.dtd_version = dtd_version.into();
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_session_endpoint(mut self, use_session_endpoint: bool) -> Self {
        self.use_session_endpoint = use_session_endpoint;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("sender", "sender-pass", "company", "user", "user-pass")
    }

    #[test]
    fn debug_redacts_passwords() {
        let debug = format!("{:?}", credentials());
        assert!(debug.contains("sender"));
        assert!(!debug.contains("sender-pass"));
        assert!(!debug.contains("user-pass"));
    }

    #[test]
    fn with_user_keeps_sender() {
        let other = credentials().with_user("other-co", "bad user", "bad pass");
        assert_eq!(other.sender_id, "sender");
        assert_eq!(other.sender_password, "sender-pass");
        assert_eq!(other.company_id, "other-co");
        assert_eq!(other.user_id, "bad user");
    }

    #[test]
    fn defaults() {
        let config = Config::new(credentials());
        assert_eq!(config.dtd_version, "3.0");
        assert_eq!(config.page_size, 500);
        assert!(config.use_session_endpoint);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn rejects_invalid_endpoint() {
        let result = Config::new(credentials()).with_endpoint_str("not a url");
        assert!(matches!(result, Err(Error::InvalidEndpoint)));
    }
}
