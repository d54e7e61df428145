//! Sentry integration for intacct-rs errors.
//!
//! This module provides integration with Sentry for error reporting and breadcrumb capture.
//! It is only available when the `sentry` feature is enabled.
//!
//! # Usage
//!
//! Enable the `sentry` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! intacct-rs = { version = "0.1", features = ["sentry"] }
//! ```
//!
//! Then set up tracing with `ErrorLayer` and `sentry-tracing`:
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//! use tracing_error::ErrorLayer;
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ErrorLayer::default())  // Required for SpanTrace capture
//!     .with(sentry::integrations::tracing::layer())
//!     .init();
//! ```

use std::collections::BTreeMap;

use sentry_core::{Breadcrumb, protocol::Value};

use crate::error::Error;

const BODY_PREVIEW_LEN: usize = 500;

/// Convert an intacct-rs Error into a Sentry breadcrumb.
impl<'a> From<&'a Error> for Breadcrumb {
    fn from(error: &'a Error) -> Self {
        let (category, message, data) = match error {
            Error::Request(source) => (
                "http.request",
                format!("HTTP request error: {source}"),
                BTreeMap::new(),
            ),

            Error::HttpStatus {
                status_code, url, ..
            } => {
                let mut data = BTreeMap::new();
                data.insert("url".to_string(), Value::from(url.clone()));
                data.insert("status_code".to_string(), Value::from(status_code.as_u16()));
                ("http.response", format!("Unexpected status {status_code}"), data)
            }

            Error::Xml { message, .. } => (
                "http.response",
                format!("Malformed XML response: {message}"),
                BTreeMap::new(),
            ),

            Error::Encode(message) => (
                "intacct.request",
                format!("Failed to encode request: {message}"),
                BTreeMap::new(),
            ),

            Error::Api {
                stage,
                function,
                errors,
                ..
            } => {
                let mut data = BTreeMap::new();
                data.insert("stage".to_string(), Value::from(stage.to_string()));
                if let Some(function) = function {
                    data.insert("function".to_string(), Value::from(function.clone()));
                }
                let numbers: Vec<Value> = errors
                    .iter()
                    .map(|e| Value::from(e.error_no.clone()))
                    .collect();
                data.insert("error_numbers".to_string(), Value::from(numbers));
                ("intacct.api", format!("Intacct {stage} failure"), data)
            }

            Error::NoSession => (
                "intacct.session",
                "Query without an API session".to_string(),
                BTreeMap::new(),
            ),

            Error::MissingElement { path } => {
                let mut data = BTreeMap::new();
                data.insert("path".to_string(), Value::from(path.clone()));
                ("http.response", format!("Missing element {path}"), data)
            }

            Error::InvalidEndpoint => (
                "intacct.config",
                "Invalid endpoint URL".to_string(),
                BTreeMap::new(),
            ),

            Error::Config { variable } => (
                "intacct.config",
                format!("Missing environment variable {variable}"),
                BTreeMap::new(),
            ),
        };

        Breadcrumb {
            ty: "error".to_string(),
            category: Some(category.to_string()),
            message: Some(message),
            data,
            level: sentry_core::Level::Error,
            ..Default::default()
        }
    }
}

/// Extract span trace, response body preview and gateway error details for
/// use as extra Sentry context.
pub fn error_to_sentry_context(error: &Error) -> BTreeMap<String, Value> {
    let mut context = BTreeMap::new();

    if let Some(span_trace) = error.span_trace() {
        context.insert(
            "intacct.span_trace".to_string(),
            Value::from(format!("{span_trace}")),
        );
    }

    let body = match error {
        Error::HttpStatus { response_body, .. } | Error::Xml { response_body, .. } => {
            response_body.as_deref()
        }
        _ => None,
    };
    if let Some(body) = body {
        let truncated: String = body.chars().take(BODY_PREVIEW_LEN).collect();
        context.insert("intacct.response_body".to_string(), Value::from(truncated));
    }

    for (i, detail) in error.api_errors().iter().enumerate() {
        context.insert(format!("intacct.error.{i}"), Value::from(detail.to_string()));
    }

    context
}
