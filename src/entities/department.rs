use serde::{Deserialize, Serialize};

use crate::{
    Client,
    entities::{ObjectQuery, QueryRow},
    error::Result,
    utils::xml::Element,
};

pub const OBJECT: &str = "DEPARTMENT";
pub const ROW: &str = "department";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Department title (`TITLE`)
    pub name: String,
    /// Department id (`DEPARTMENTID`)
    pub id: String,
    #[serde(rename = "parentid")]
    pub parent_id: String,
    /// Record number of the parent department
    #[serde(rename = "parentkey")]
    pub parent_key: String,
    pub status: String,
}

impl QueryRow for Department {
    const ROW: &'static str = ROW;

    fn from_element(element: &Element) -> Self {
        Self {
            name: element.child_text("TITLE").into_owned(),
            id: element.child_text("DEPARTMENTID").into_owned(),
            parent_id: element.child_text("PARENTID").into_owned(),
            parent_key: element.child_text("PARENTKEY").into_owned(),
            status: element.child_text("STATUS").into_owned(),
        }
    }
}

impl ObjectQuery for Department {
    const OBJECT: &'static str = OBJECT;
}

/// Retrieve the first page of departments.
#[instrument(skip(client))]
pub async fn list(client: &Client) -> Result<Vec<Department>> {
    client.query_page::<Department>().await
}

/// Retrieve every department.
#[instrument(skip(client))]
pub async fn list_all(client: &Client) -> Result<Vec<Department>> {
    client.query_all::<Department>().await
}
