//! # intacct-rs
//!
//! A Rust client library for the Sage Intacct XML API gateway.
//!
//! The client opens an API session with sender and user credentials and then
//! runs read-only queries under it, turning the XML rows that come back into
//! flat records.
//!
//! ```ignore
//! use intacct_rs::{Client, Config};
//!
//! let client = Client::authenticate(Config::from_env()?).await?;
//! for department in client.departments().list().await? {
//!     println!("{} {}", department.id, department.name);
//! }
//! ```
//!
//! ## Sentry Integration
//!
//! Gateway failures capture a span trace when created inside an instrumented
//! span. Install `tracing_error::ErrorLayer` to make it available through
//! [`Error::span_trace`], and enable the `sentry` feature to convert errors
//! into breadcrumbs.

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod client;
pub mod config;
pub mod endpoints;
pub mod entities;
pub mod error;
pub mod functions;
pub mod request;
pub mod response;
pub mod session;
pub mod utils;

#[cfg(feature = "sentry")]
pub mod sentry_integration;

pub use client::{Client, CredentialCheck};
pub use config::{Config, Credentials};
pub use endpoints::GatewayEndpoint;
pub use entities::*;
pub use error::{ApiErrorDetail, Error, Stage};
pub use functions::{DimensionBalanceParameters, Function, ReadByQuery, TrialBalanceParameters};
pub use response::{FunctionResult, Page, Response};
pub use session::Session;

// Re-export SpanTrace for users who want to access it
pub use tracing_error::SpanTrace;
