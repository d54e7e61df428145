use std::fmt;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;
use tracing_error::SpanTrace;

/// The level of the gateway response at which a failure was reported.
///
/// Intacct reports status separately for the sender (`control`), the user
/// login or session (`operation/authentication`) and each function
/// (`operation/result`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Control,
    Authentication,
    Result,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Control => write!(f, "control"),
            Self::Authentication => write!(f, "authentication"),
            Self::Result => write!(f, "result"),
        }
    }
}

/// A single `<error>` entry from an `<errormessage>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiErrorDetail {
    pub error_no: String,
    pub description: String,
    pub description2: String,
    pub correction: String,
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = if self.description2.is_empty() {
            &self.description
        } else {
            &self.description2
        };
        write!(f, "{}: {}", self.error_no, message)?;
        if !self.correction.is_empty() {
            write!(f, " ({})", self.correction)?;
        }
        Ok(())
    }
}

fn summarize(errors: &[ApiErrorDetail]) -> String {
    if errors.is_empty() {
        return "no error details returned".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur when interacting with the Intacct XML gateway.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("error making request: {0:?}")]
    #[diagnostic(
        code(intacct_rs::request_error),
        help("Check your network connection and Intacct gateway availability")
    )]
    Request(#[source] reqwest::Error),

    #[error("unexpected HTTP status {status_code} from {url}")]
    #[diagnostic(
        code(intacct_rs::http_status),
        help("The gateway did not accept the request at the HTTP level")
    )]
    HttpStatus {
        status_code: reqwest::StatusCode,
        url: String,
        response_body: Option<String>,
    },

    #[error("error decoding XML response: {message}")]
    #[diagnostic(
        code(intacct_rs::xml_error),
        help("The gateway returned a document that is not well-formed XML")
    )]
    Xml {
        message: String,
        response_body: Option<String>,
    },

    #[error("error encoding XML request: {0}")]
    #[diagnostic(code(intacct_rs::encode_error))]
    Encode(String),

    /// The gateway processed the request and reported a failure status.
    #[error("intacct {stage} failure: {}", summarize(.errors))]
    #[diagnostic(
        code(intacct_rs::api_failure),
        help("Review the error numbers and corrections returned by the Intacct gateway")
    )]
    Api {
        stage: Stage,
        function: Option<String>,
        errors: Vec<ApiErrorDetail>,
        span_trace: SpanTrace,
    },

    /// A query was attempted on a client without an API session.
    #[error("no API session is open")]
    #[diagnostic(
        code(intacct_rs::no_session),
        help("Authenticate successfully before issuing queries")
    )]
    NoSession,

    #[error("response is missing expected element `{path}`")]
    #[diagnostic(
        code(intacct_rs::missing_element),
        help("The API returned data in an unexpected format")
    )]
    MissingElement { path: String },

    #[error("endpoint could not be parsed as a URL")]
    #[diagnostic(
        code(intacct_rs::invalid_endpoint),
        help("Check that the gateway endpoint URL is correctly formatted")
    )]
    InvalidEndpoint,

    #[error("environment variable `{variable}` is not set")]
    #[diagnostic(
        code(intacct_rs::config),
        help("Set the INTACCT_* variables or build the configuration explicitly")
    )]
    Config { variable: String },
}

impl Error {
    pub(crate) fn api(stage: Stage, function: Option<String>, errors: Vec<ApiErrorDetail>) -> Self {
        Self::Api {
            stage,
            function,
            errors,
            span_trace: SpanTrace::capture(),
        }
    }

    pub(crate) fn xml(message: impl fmt::Display, response_body: Option<String>) -> Self {
        Self::Xml {
            message: message.to_string(),
            response_body,
        }
    }

    pub(crate) fn missing(path: &str) -> Self {
        Self::MissingElement {
            path: path.to_string(),
        }
    }

    /// The span trace captured when a gateway failure was decoded.
    #[must_use]
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::Api { span_trace, .. } => Some(span_trace),
            _ => None,
        }
    }

    /// Error details reported by the gateway, empty for transport and decoding errors.
    #[must_use]
    pub fn api_errors(&self) -> &[ApiErrorDetail] {
        match self {
            Self::Api { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e)
    }
}

/// Type alias for results from this crate.
///
/// This is already a Miette diagnostic result due to the implementation of
/// the Diagnostic trait for the Error type.
pub type Result<O> = std::result::Result<O, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_prefers_description2() {
        let error = Error::api(
            Stage::Authentication,
            None,
            vec![ApiErrorDetail {
                error_no: "XL03000006".to_string(),
                description: String::new(),
                description2: "Sign-in information is incorrect".to_string(),
                correction: String::new(),
            }],
        );

        assert_eq!(
            error.to_string(),
            "intacct authentication failure: XL03000006: Sign-in information is incorrect"
        );
        assert!(error.span_trace().is_some());
        assert_eq!(error.api_errors().len(), 1);
    }

    #[test]
    fn api_error_without_details() {
        let error = Error::api(Stage::Control, None, Vec::new());
        assert_eq!(
            error.to_string(),
            "intacct control failure: no error details returned"
        );
    }
}
