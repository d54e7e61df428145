use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Client,
    entities::QueryRow,
    error::Result,
    functions::TrialBalanceParameters,
    utils::xml::Element,
};

pub const ROW: &str = "trialbalance";

/// One account line of a trial balance report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// GL account number (`glaccountno`)
    pub id: String,
    /// Ending balance as returned (`endbalance`)
    pub balance: String,
    #[serde(rename = "reportingbook")]
    pub reporting_book: String,
    pub currency: String,
}

impl TrialBalance {
    /// The ending balance as a decimal, if it parses.
    #[must_use]
    pub fn end_balance(&self) -> Option<Decimal> {
        Decimal::from_str(self.balance.trim()).ok()
    }
}

impl QueryRow for TrialBalance {
    const ROW: &'static str = ROW;

    fn from_element(element: &Element) -> Self {
        Self {
            id: element.child_text("glaccountno").into_owned(),
            balance: element.child_text("endbalance").into_owned(),
            reporting_book: element.child_text("reportingbook").into_owned(),
            currency: element.child_text("currency").into_owned(),
        }
    }
}

/// Retrieve the trial balance for one department and location.
#[instrument(skip(client))]
pub async fn get(client: &Client, parameters: TrialBalanceParameters) -> Result<Vec<TrialBalance>> {
    let result = client.call(parameters.into()).await?;
    let balances: Vec<TrialBalance> = result.rows();
    debug!(count = balances.len(), "trial balance lines");
    Ok(balances)
}
