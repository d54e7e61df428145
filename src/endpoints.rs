use std::{convert::TryFrom, fmt};
use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_GATEWAY_URL: &str = "https://api.intacct.com/ia/xml/xmlgw.phtml";

/// Where gateway requests are posted.
///
/// Every call goes to the same XML gateway; the function to run travels in
/// the request body. `getAPISession` may hand back a session-specific
/// gateway, which is used for the rest of that session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GatewayEndpoint {
    #[default]
    Default,
    Session(Url),
    Custom(Url),
}

impl GatewayEndpoint {
    /// Converts the endpoint to a URL.
    pub fn to_url(&self) -> Result<Url> {
        match self {
            Self::Default => Url::parse(DEFAULT_GATEWAY_URL).map_err(|_| Error::InvalidEndpoint),
            Self::Session(url) | Self::Custom(url) => Ok(url.clone()),
        }
    }

    /// Parse a session endpoint as returned in `<api><endpoint>`.
    pub fn session(endpoint: &str) -> Result<Self> {
        Url::parse(endpoint.trim())
            .map(Self::Session)
            .map_err(|_| Error::InvalidEndpoint)
    }
}

impl fmt::Display for GatewayEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_url() {
            Ok(url) => write!(f, "{url}"),
            Err(_) => write!(f, "Invalid endpoint"),
        }
    }
}

// Allow conversion from GatewayEndpoint to a Url
impl TryFrom<GatewayEndpoint> for Url {
    type Error = Error;

    fn try_from(endpoint: GatewayEndpoint) -> Result<Self> {
        endpoint.to_url()
    }
}
