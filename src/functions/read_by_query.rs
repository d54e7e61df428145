use serde::Serialize;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::Result;
use crate::utils::xml::XmlWriter;

/// A `readByQuery` call: select `fields` from `object` rows matching `query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadByQuery {
    pub object: String,
    pub fields: String,
    pub query: String,
    pub page_size: u32,
}

impl ReadByQuery {
    /// All fields of every `object` row, one page of [`DEFAULT_PAGE_SIZE`].
    #[must_use]
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            fields: "*".to_string(),
            query: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = fields.into();
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub(crate) fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start("readByQuery")?;
        writer.text_element("object", &self.object)?;
        writer.text_element("fields", &self.fields)?;
        writer.text_element("query", &self.query)?;
        writer.text_element("pagesize", &self.page_size.to_string())?;
        writer.end("readByQuery")
    }
}

/// A `readMore` call continuing a previous query by its result id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadMore {
    pub result_id: String,
}

impl ReadMore {
    #[must_use]
    pub fn new(result_id: impl Into<String>) -> Self {
        Self {
            result_id: result_id.into(),
        }
    }

    pub(crate) fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start("readMore")?;
        writer.text_element("resultId", &self.result_id)?;
        writer.end("readMore")
    }
}
