use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::functions::ReadByQuery;
use crate::utils::{date_format::parse_intacct_date, xml::Element};

pub mod account;
pub mod department;
pub mod entity;
pub mod ledger;
pub mod trial_balance;

pub use account::Account;
pub use department::Department;
pub use entity::Entity;
pub use ledger::LedgerEntry;
pub use trial_balance::TrialBalance;

/// A flat field-name to string-value record built from one response row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    /// One entry per child element name; repeated names have their text joined.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let mut fields: BTreeMap<String, String> = BTreeMap::new();
        for child in &element.children {
            fields
                .entry(child.name.clone())
                .or_default()
                .push_str(&child.text_content());
        }
        Self(fields)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// A date field in `MM/DD/YYYY` or ISO form.
    #[must_use]
    pub fn date(&self, field: &str) -> Option<Date> {
        self.get(field)
            .filter(|value| !value.is_empty())
            .and_then(|value| parse_intacct_date(value).ok())
    }

    /// A numeric field such as an amount or balance.
    #[must_use]
    pub fn decimal(&self, field: &str) -> Option<Decimal> {
        self.get(field)
            .and_then(|value| Decimal::from_str(value.trim()).ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A typed view over one row element of a response.
pub trait QueryRow: Sized {
    /// Local name of the row elements inside `<data>`.
    const ROW: &'static str;

    fn from_element(element: &Element) -> Self;

    /// The row as a flat record keyed by its serialized field names.
    fn to_record(&self) -> Record
    where
        Self: Serialize,
    {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(fields)) => fields
                .into_iter()
                .map(|(key, value)| {
                    let value = match value {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (key, value)
                })
                .collect(),
            _ => Record::default(),
        }
    }
}

/// A row type read with `readByQuery` against a fixed object.
pub trait ObjectQuery: QueryRow {
    /// The Intacct object name, e.g. `GLACCOUNT`.
    const OBJECT: &'static str;
    const FIELDS: &'static str = "*";
    const QUERY: &'static str = "";

    #[must_use]
    fn read_by_query(page_size: u32) -> ReadByQuery {
        ReadByQuery::new(Self::OBJECT)
            .with_fields(Self::FIELDS)
            .with_query(Self::QUERY)
            .with_page_size(page_size)
    }
}
