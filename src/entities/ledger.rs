use serde::{Deserialize, Serialize};

use crate::{
    Client,
    entities::{ObjectQuery, QueryRow},
    error::Result,
    utils::xml::Element,
};

pub const OBJECT: &str = "GLDETAIL";
pub const ROW: &str = "gldetail";
pub const FIELDS: &str = "ACCOUNTNO, ACCOUNTTITLE, DEPARTMENTID, LOCATIONID";

/// One GL detail line, reduced to the account and the dimensions it posts to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Account number (`ACCOUNTNO`)
    pub id: String,
    /// Account title (`ACCOUNTTITLE`)
    pub name: String,
    pub department: String,
    pub location: String,
}

impl QueryRow for LedgerEntry {
    const ROW: &'static str = ROW;

    fn from_element(element: &Element) -> Self {
        Self {
            id: element.child_text("ACCOUNTNO").into_owned(),
            name: element.child_text("ACCOUNTTITLE").into_owned(),
            department: element.child_text("DEPARTMENTID").into_owned(),
            location: element.child_text("LOCATIONID").into_owned(),
        }
    }
}

impl ObjectQuery for LedgerEntry {
    const OBJECT: &'static str = OBJECT;
    const FIELDS: &'static str = FIELDS;
}

/// Retrieve the first page of GL detail lines.
#[instrument(skip(client))]
pub async fn list(client: &Client) -> Result<Vec<LedgerEntry>> {
    client.query_page::<LedgerEntry>().await
}

/// Retrieve every GL detail line. This can be a very large result set.
#[instrument(skip(client))]
pub async fn list_all(client: &Client) -> Result<Vec<LedgerEntry>> {
    client.query_all::<LedgerEntry>().await
}
