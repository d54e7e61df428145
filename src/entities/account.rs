use serde::{Deserialize, Serialize};

use crate::{
    Client,
    entities::{ObjectQuery, QueryRow},
    error::Result,
    utils::xml::Element,
};

pub const OBJECT: &str = "GLACCOUNT";
pub const ROW: &str = "glaccount";

/// A general ledger account from the chart of accounts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account number (`ACCOUNTNO`)
    pub id: String,
    /// Account title (`TITLE`)
    pub name: String,
    pub status: String,
}

impl Account {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

impl QueryRow for Account {
    const ROW: &'static str = ROW;

    fn from_element(element: &Element) -> Self {
        Self {
            id: element.child_text("ACCOUNTNO").into_owned(),
            name: element.child_text("TITLE").into_owned(),
            status: element.child_text("STATUS").into_owned(),
        }
    }
}

impl ObjectQuery for Account {
    const OBJECT: &'static str = OBJECT;
}

/// Retrieve the first page of GL accounts.
#[instrument(skip(client))]
pub async fn list(client: &Client) -> Result<Vec<Account>> {
    client.query_page::<Account>().await
}

/// Retrieve every GL account, following `readMore` until the result set is exhausted.
#[instrument(skip(client))]
pub async fn list_all(client: &Client) -> Result<Vec<Account>> {
    client.query_all::<Account>().await
}
