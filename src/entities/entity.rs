//! Reporting entities.
//!
//! Ledger lines reference locations rather than `LOCATIONENTITY` records,
//! so active locations are what this crate reports as entities.

use serde::{Deserialize, Serialize};

use crate::{
    Client,
    entities::{ObjectQuery, QueryRow},
    error::Result,
    utils::xml::Element,
};

pub const OBJECT: &str = "LOCATION";
pub const ROW: &str = "location";
/// Only active locations.
pub const ACTIVE_QUERY: &str = "status = 'T'";

/// The object read when checking credentials.
pub const ENTITY_OBJECT: &str = "LOCATIONENTITY";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    /// Location id (`LOCATIONID`)
    pub id: String,
    #[serde(rename = "parentid")]
    pub parent_id: String,
    pub status: String,
}

impl QueryRow for Entity {
    const ROW: &'static str = ROW;

    fn from_element(element: &Element) -> Self {
        Self {
            name: element.child_text("NAME").into_owned(),
            id: element.child_text("LOCATIONID").into_owned(),
            parent_id: element.child_text("PARENTID").into_owned(),
            status: element.child_text("STATUS").into_owned(),
        }
    }
}

impl ObjectQuery for Entity {
    const OBJECT: &'static str = OBJECT;
    const QUERY: &'static str = ACTIVE_QUERY;
}

/// Retrieve the first page of active entities.
#[instrument(skip(client))]
pub async fn list(client: &Client) -> Result<Vec<Entity>> {
    client.query_page::<Entity>().await
}

/// Retrieve every active entity.
#[instrument(skip(client))]
pub async fn list_all(client: &Client) -> Result<Vec<Entity>> {
    client.query_all::<Entity>().await
}
