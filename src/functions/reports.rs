use serde::Serialize;
use time::{Date, OffsetDateTime, macros::date};

use crate::error::Result;
use crate::utils::{date_format::write_date_parts, xml::XmlWriter};

/// Earliest date the trial balance covers by default.
pub const EPOCH_START: Date = date!(1900 - 01 - 01);

/// Parameters for `get_trialbalance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalanceParameters {
    pub start_date: Date,
    pub end_date: Date,
    pub department_id: String,
    pub location_id: String,
}

impl TrialBalanceParameters {
    /// Balances for one department and location from 1900-01-01 through today (UTC).
    #[must_use]
    pub fn new(department_id: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            start_date: EPOCH_START,
            end_date: OffsetDateTime::now_utc().date(),
            department_id: department_id.into(),
            location_id: location_id.into(),
        }
    }

    #[must_use]
    pub fn with_date_range(mut self, start_date: Date, end_date: Date) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub(crate) fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start("get_trialbalance")?;
        write_date_parts(writer, "startdate", self.start_date)?;
        write_date_parts(writer, "enddate", self.end_date)?;
        if !self.department_id.is_empty() {
            writer.text_element("departmentid", &self.department_id)?;
        }
        if !self.location_id.is_empty() {
            writer.text_element("locationid", &self.location_id)?;
        }
        writer.end("get_trialbalance")
    }
}

/// Parameters for `get_accountbalancesbydimensions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionBalanceParameters {
    pub start_date: Date,
    pub end_date: Date,
    pub location_id: Option<String>,
    pub department_id: Option<String>,
}

impl DimensionBalanceParameters {
    #[must_use]
    pub fn new(start_date: Date, end_date: Date) -> Self {
        Self {
            start_date,
            end_date,
            location_id: None,
            department_id: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    #[must_use]
    pub fn with_department(mut self, department_id: impl Into<String>) -> Self {
        self.department_id = Some(department_id.into());
        self
    }

    pub(crate) fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start("get_accountbalancesbydimensions")?;
        write_date_parts(writer, "startdate", self.start_date)?;
        write_date_parts(writer, "enddate", self.end_date)?;
        if let Some(location_id) = &self.location_id {
            writer.text_element("locationid", location_id)?;
        }
        if let Some(department_id) = &self.department_id {
            writer.text_element("departmentid", department_id)?;
        }
        writer.end("get_accountbalancesbydimensions")
    }
}
