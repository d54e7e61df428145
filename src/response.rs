//! Gateway response documents.
//!
//! Status is reported at three levels (control, authentication and each
//! function result); a `failure` at any of them becomes [`Error::Api`].

use serde::Serialize;

use crate::entities::{QueryRow, Record};
use crate::error::{ApiErrorDetail, Error, Result, Stage};
use crate::utils::xml::Element;

const SUCCESS: &str = "success";

/// A parsed `<response>` document whose statuses were all `success`.
#[derive(Debug, Clone)]
pub struct Response {
    pub control_id: String,
    pub user_id: String,
    pub company_id: String,
    pub results: Vec<FunctionResult>,
}

/// One `<operation><result>` block.
#[derive(Debug, Clone)]
pub struct FunctionResult {
    pub function: String,
    pub control_id: String,
    pub data: Option<ResultData>,
}

/// The `<data>` block of a result with its paging attributes.
#[derive(Debug, Clone)]
pub struct ResultData {
    pub list_type: String,
    pub count: u32,
    pub total_count: u32,
    pub num_remaining: u32,
    pub result_id: Option<String>,
    pub element: Element,
}

impl Response {
    /// Parse a gateway response, failing on the first non-success status.
    pub fn parse(xml: &str) -> Result<Self> {
        let root = Element::parse(xml).map_err(|e| match e {
            Error::Xml { message, .. } => Error::xml(message, Some(xml.to_string())),
            other => other,
        })?;
        Self::from_element(&root)
    }

    pub fn from_element(root: &Element) -> Result<Self> {
        if root.name != "response" {
            return Err(Error::missing("response"));
        }

        let control = root
            .child("control")
            .ok_or_else(|| Error::missing("response/control"))?;
        if control.child_text("status") != SUCCESS {
            return Err(failure(Stage::Control, None, root));
        }

        let operation = root
            .child("operation")
            .ok_or_else(|| Error::missing("response/operation"))?;
        let authentication = operation
            .child("authentication")
            .ok_or_else(|| Error::missing("response/operation/authentication"))?;
        if authentication.child_text("status") != SUCCESS {
            // errors sit beside the authentication block, or inside it on some gateways
            let errors = if operation.child("errormessage").is_some() {
                operation
            } else {
                authentication
            };
            return Err(failure(Stage::Authentication, None, errors));
        }

        let mut results = Vec::new();
        for result in operation.children_named("result") {
            let function = result.child_text("function").into_owned();
            if result.child_text("status") != SUCCESS {
                warn!(%function, status = %result.child_text("status"), "function failed");
                return Err(failure(Stage::Result, Some(function), result));
            }
            results.push(FunctionResult {
                function,
                control_id: result.child_text("controlid").into_owned(),
                data: result.child("data").map(ResultData::from_element),
            });
        }

        Ok(Self {
            control_id: control.child_text("controlid").into_owned(),
            user_id: authentication.child_text("userid").into_owned(),
            company_id: authentication.child_text("companyid").into_owned(),
            results,
        })
    }

    /// The single function result of a one-function request.
    pub fn into_result(self) -> Result<FunctionResult> {
        self.results
            .into_iter()
            .next()
            .ok_or_else(|| Error::missing("response/operation/result"))
    }
}

fn failure(stage: Stage, function: Option<String>, parent: &Element) -> Error {
    let errors = parent
        .child("errormessage")
        .map(|message| {
            message
                .children_named("error")
                .map(|error| ApiErrorDetail {
                    error_no: error.child_text("errorno").into_owned(),
                    description: error.child_text("description").into_owned(),
                    description2: error.child_text("description2").into_owned(),
                    correction: error.child_text("correction").into_owned(),
                })
                .collect()
        })
        .unwrap_or_default();
    Error::api(stage, function, errors)
}

impl ResultData {
    fn from_element(element: &Element) -> Self {
        let number = |name: &str| {
            element
                .attribute(name)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(0)
        };
        Self {
            list_type: element.attribute("listtype").unwrap_or_default().to_string(),
            count: number("count"),
            total_count: number("totalcount"),
            num_remaining: number("numremaining"),
            result_id: element
                .attribute("resultId")
                .filter(|id| !id.is_empty())
                .map(ToString::to_string),
            element: element.clone(),
        }
    }
}

/// One page of a query result plus what is needed to fetch the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub list_type: String,
    pub count: u32,
    pub total_count: u32,
    pub num_remaining: u32,
    pub result_id: Option<String>,
}

impl<T> Page<T> {
    /// The result id to pass to `readMore`, if rows remain.
    #[must_use]
    pub fn next_result_id(&self) -> Option<&str> {
        if self.num_remaining == 0 {
            return None;
        }
        self.result_id.as_deref()
    }
}

impl Page<Record> {
    #[must_use]
    pub fn from_result(result: &FunctionResult) -> Self {
        let records = result.all_records();
        match &result.data {
            Some(data) => Self {
                records,
                list_type: data.list_type.clone(),
                count: data.count,
                total_count: data.total_count,
                num_remaining: data.num_remaining,
                result_id: data.result_id.clone(),
            },
            None => Self {
                records,
                ..Self::default()
            },
        }
    }
}

impl FunctionResult {
    /// Typed rows, one per `T::ROW` element in document order.
    #[must_use]
    pub fn rows<T: QueryRow>(&self) -> Vec<T> {
        self.data
            .as_ref()
            .map(|data| {
                data.element
                    .descendants(T::ROW)
                    .into_iter()
                    .map(T::from_element)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Generic records, one per `row` element in document order.
    #[must_use]
    pub fn records(&self, row: &str) -> Vec<Record> {
        self.data
            .as_ref()
            .map(|data| {
                data.element
                    .descendants(row)
                    .into_iter()
                    .map(Record::from_element)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Records for every direct child of `<data>`, whatever its name.
    #[must_use]
    pub fn all_records(&self) -> Vec<Record> {
        self.data
            .as_ref()
            .map(|data| data.element.children.iter().map(Record::from_element).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTH_FAILURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <control>
    <status>success</status>
    <senderid>sender-id</senderid>
    <controlid>c1</controlid>
  </control>
  <operation>
    <authentication>
      <status>failure</status>
      <userid>bad user</userid>
      <companyid>some-company</companyid>
    </authentication>
    <errormessage>
      <error>
        <errorno>XL03000006</errorno>
        <description></description>
        <description2>Sign-in information is incorrect</description2>
        <correction></correction>
      </error>
    </errormessage>
  </operation>
</response>"#;

    const CONTROL_FAILURE: &str = r#"<response>
  <control><status>failure</status></control>
  <errormessage>
    <error><errorno>XL03000002</errorno><description>Invalid Web Services Authorization</description></error>
  </errormessage>
</response>"#;

    const RESULT_FAILURE: &str = r#"<response>
  <control><status>success</status></control>
  <operation>
    <authentication><status>success</status></authentication>
    <result>
      <status>failure</status>
      <function>readByQuery</function>
      <controlid>c3</controlid>
      <errormessage>
        <error><errorno>DL02000001</errorno><description2>Unknown object NOPE</description2></error>
        <error><errorno>BL01001973</errorno></error>
      </errormessage>
    </result>
  </operation>
</response>"#;

    #[test]
    fn authentication_failure() {
        match Response::parse(AUTH_FAILURE) {
            Err(Error::Api { stage, errors, .. }) => {
                assert_eq!(stage, Stage::Authentication);
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].error_no, "XL03000006");
                assert_eq!(errors[0].description2, "Sign-in information is incorrect");
            }
            other => panic!("expected authentication failure, got {other:?}"),
        }
    }

    #[test]
    fn control_failure() {
        match Response::parse(CONTROL_FAILURE) {
            Err(Error::Api { stage, errors, function, .. }) => {
                assert_eq!(stage, Stage::Control);
                assert!(function.is_none());
                assert_eq!(errors[0].description, "Invalid Web Services Authorization");
            }
            other => panic!("expected control failure, got {other:?}"),
        }
    }

    #[test]
    fn result_failure_keeps_every_error() {
        match Response::parse(RESULT_FAILURE) {
            Err(Error::Api { stage, errors, function, .. }) => {
                assert_eq!(stage, Stage::Result);
                assert_eq!(function.as_deref(), Some("readByQuery"));
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[1].error_no, "BL01001973");
                assert_eq!(errors[1].description2, "");
            }
            other => panic!("expected result failure, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_kept() {
        match Response::parse("<response><control>") {
            Err(Error::Xml { response_body, .. }) => {
                assert_eq!(response_body.as_deref(), Some("<response><control>"));
            }
            other => panic!("expected XML error, got {other:?}"),
        }
    }

    #[test]
    fn wrong_root_is_missing_response() {
        assert!(matches!(
            Response::parse("<html><body/></html>"),
            Err(Error::MissingElement { .. })
        ));
    }

    #[test]
    fn paging_attributes() {
        let xml = r#"<response>
  <control><status>success</status><controlid>c9</controlid></control>
  <operation>
    <authentication><status>success</status><userid>u</userid><companyid>c</companyid></authentication>
    <result>
      <status>success</status>
      <function>readByQuery</function>
      <controlid>c9</controlid>
      <data listtype="glaccount" count="1" totalcount="3" numremaining="2" resultId="r-42">
        <glaccount><ACCOUNTNO>1000</ACCOUNTNO></glaccount>
      </data>
    </result>
  </operation>
</response>"#;
        let response = Response::parse(xml).unwrap();
        assert_eq!(response.control_id, "c9");
        assert_eq!(response.company_id, "c");
        let result = response.into_result().unwrap();
        let data = result.data.as_ref().unwrap();
        assert_eq!(data.list_type, "glaccount");
        assert_eq!((data.count, data.total_count, data.num_remaining), (1, 3, 2));
        assert_eq!(data.result_id.as_deref(), Some("r-42"));
        assert_eq!(result.records("glaccount")[0].get("ACCOUNTNO"), Some("1000"));

        let page = Page::from_result(&result);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.next_result_id(), Some("r-42"));
    }

    #[test]
    fn last_page_has_no_continuation() {
        let page: Page<Record> = Page {
            num_remaining: 0,
            result_id: Some("r-42".to_string()),
            ..Page::default()
        };
        assert_eq!(page.next_result_id(), None);
    }
}
