use serde::Serialize;

use crate::endpoints::GatewayEndpoint;
use crate::error::{Error, Result};
use crate::response::FunctionResult;

/// An API session opened by `getAPISession`.
///
/// The id is opaque and is never refreshed; it lives as long as the client
/// that opened it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: String,
    /// Gateway to use for calls made with this session.
    #[serde(skip)]
    pub endpoint: GatewayEndpoint,
}

impl Session {
    /// Read `<data><api><sessionid>` and `<endpoint>` from a `getAPISession` result.
    pub(crate) fn from_result(result: &FunctionResult, fallback: &GatewayEndpoint) -> Result<Self> {
        let api = result
            .data
            .as_ref()
            .and_then(|data| data.element.child("api"))
            .ok_or_else(|| Error::missing("data/api"))?;

        let id = api.child_text("sessionid").trim().to_string();
        if id.is_empty() {
            return Err(Error::missing("data/api/sessionid"));
        }

        let endpoint_text = api.child_text("endpoint");
        let endpoint = if endpoint_text.trim().is_empty() {
            fallback.clone()
        } else {
            match GatewayEndpoint::session(&endpoint_text) {
                Ok(endpoint) => endpoint,
                Err(_) => {
                    warn!(endpoint = %endpoint_text, "ignoring unparseable session endpoint");
                    fallback.clone()
                }
            }
        };

        Ok(Self { id, endpoint })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;

    fn session_response(api: &str) -> FunctionResult {
        let xml = format!(
            "<response><control><status>success</status></control><operation>\
             <authentication><status>success</status></authentication>\
             <result><status>success</status><function>getAPISession</function>\
             <controlid>c</controlid><data>{api}</data></result></operation></response>"
        );
        Response::parse(&xml).unwrap().into_result().unwrap()
    }

    #[test]
    fn reads_session_and_endpoint() {
        let result = session_response(
            "<api><sessionid>nOtAsEcReT..</sessionid>\
             <endpoint>https://api.intacct.com/ia/xml/xmlgw.phtml</endpoint>\
             <locationid></locationid></api>",
        );
        let session = Session::from_result(&result, &GatewayEndpoint::Default).unwrap();
        assert_eq!(session.id, "nOtAsEcReT..");
        assert!(matches!(session.endpoint, GatewayEndpoint::Session(_)));
    }

    #[test]
    fn falls_back_without_endpoint() {
        let result = session_response("<api><sessionid>abc</sessionid><endpoint/></api>");
        let session = Session::from_result(&result, &GatewayEndpoint::Default).unwrap();
        assert_eq!(session.endpoint, GatewayEndpoint::Default);
    }

    #[test]
    fn empty_session_id_is_an_error() {
        let result = session_response("<api><sessionid> </sessionid></api>");
        assert!(matches!(
            Session::from_result(&result, &GatewayEndpoint::Default),
            Err(Error::MissingElement { .. })
        ));
    }
}
