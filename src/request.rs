//! Request envelopes for the XML gateway.

use uuid::Uuid;

use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::functions::Function;
use crate::utils::xml::XmlWriter;

/// How the operation block authenticates.
#[derive(Debug, Clone, Copy)]
pub enum Authentication<'a> {
    /// Company login with user id and password.
    Login(&'a Credentials),
    /// An API session opened by `getAPISession`.
    Session(&'a str),
}

/// One `<request>` document: sender control block plus a single function.
#[derive(Debug)]
pub struct Request<'a> {
    credentials: &'a Credentials,
    dtd_version: &'a str,
    authentication: Authentication<'a>,
    function: &'a Function,
    control_id: String,
}

impl<'a> Request<'a> {
    #[must_use]
    pub fn new(config: &'a Config, authentication: Authentication<'a>, function: &'a Function) -> Self {
        Self {
            credentials: &config.credentials,
            dtd_version: &config.dtd_version,
            authentication,
            function,
            control_id: Uuid::new_v4().to_string(),
        }
    }

    #[must_use]
    pub fn control_id(&self) -> &str {
        &self.control_id
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut writer = XmlWriter::new()?;
        writer.start("request")?;

        writer.start("control")?;
        writer.text_element("senderid", &self.credentials.sender_id)?;
        writer.text_element("password", &self.credentials.sender_password)?;
        writer.text_element("controlid", &self.control_id)?;
        writer.text_element("uniqueid", "false")?;
        writer.text_element("dtdversion", self.dtd_version)?;
        writer.text_element("includewhitespace", "false")?;
        writer.end("control")?;

        writer.start("operation")?;
        writer.start("authentication")?;
        match self.authentication {
            Authentication::Login(login) => {
                writer.start("login")?;
                writer.text_element("userid", &login.user_id)?;
                writer.text_element("companyid", &login.company_id)?;
                writer.text_element("password", &login.user_password)?;
                writer.end("login")?;
            }
            Authentication::Session(session_id) => {
                writer.text_element("sessionid", session_id)?;
            }
        }
        writer.end("authentication")?;

        writer.start("content")?;
        writer.start_with_attributes("function", &[("controlid", self.control_id.as_str())])?;
        self.function.write_xml(&mut writer)?;
        writer.end("function")?;
        writer.end("content")?;
        writer.end("operation")?;

        writer.end("request")?;
        writer.finish()
    }
}
