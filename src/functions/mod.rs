//! Gateway functions, the payload inside `<content><function>`.

use crate::error::Result;
use crate::utils::xml::XmlWriter;

pub mod read_by_query;
pub mod reports;

pub use read_by_query::{ReadByQuery, ReadMore};
pub use reports::{DimensionBalanceParameters, TrialBalanceParameters};

/// A single function call carried by a request envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Function {
    GetApiSession,
    ReadByQuery(ReadByQuery),
    ReadMore(ReadMore),
    GetTrialBalance(TrialBalanceParameters),
    GetAccountBalancesByDimensions(DimensionBalanceParameters),
}

impl Function {
    /// The function element name, as echoed back in `<result><function>`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetApiSession => "getAPISession",
            Self::ReadByQuery(_) => "readByQuery",
            Self::ReadMore(_) => "readMore",
            Self::GetTrialBalance(_) => "get_trialbalance",
            Self::GetAccountBalancesByDimensions(_) => "get_accountbalancesbydimensions",
        }
    }

    pub(crate) fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        match self {
            Self::GetApiSession => writer.empty(self.name()),
            Self::ReadByQuery(query) => query.write_xml(writer),
            Self::ReadMore(read_more) => read_more.write_xml(writer),
            Self::GetTrialBalance(params) => params.write_xml(writer),
            Self::GetAccountBalancesByDimensions(params) => params.write_xml(writer),
        }
    }
}

impl From<ReadByQuery> for Function {
    fn from(query: ReadByQuery) -> Self {
        Self::ReadByQuery(query)
    }
}

impl From<ReadMore> for Function {
    fn from(read_more: ReadMore) -> Self {
        Self::ReadMore(read_more)
    }
}

impl From<TrialBalanceParameters> for Function {
    fn from(params: TrialBalanceParameters) -> Self {
        Self::GetTrialBalance(params)
    }
}

impl From<DimensionBalanceParameters> for Function {
    fn from(params: DimensionBalanceParameters) -> Self {
        Self::GetAccountBalancesByDimensions(params)
    }
}
