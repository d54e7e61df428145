use std::sync::Arc;

use reqwest::{StatusCode, header};
use serde::Serialize;

use crate::config::Config;
use crate::endpoints::GatewayEndpoint;
use crate::entities::{
    self, Account, Department, Entity, LedgerEntry, ObjectQuery, Record, TrialBalance,
    entity::ENTITY_OBJECT,
};
use crate::error::{Error, Result};
use crate::functions::{DimensionBalanceParameters, Function, ReadByQuery, ReadMore, TrialBalanceParameters};
use crate::request::{Authentication, Request};
use crate::response::{FunctionResult, Page, Response};
use crate::session::Session;

const CONTENT_TYPE_XML: &str = "application/xml";

/// Outcome of [`Client::check_credentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialCheck {
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug)]
enum SessionState {
    Open {
        http: reqwest::Client,
        session: Session,
    },
    Failed(Arc<Error>),
}

/// This is the client that is used for interacting with the Intacct XML gateway. It holds the
/// configuration and the API session opened when it was created.
#[derive(Clone, Debug)]
pub struct Client {
    config: Config,
    state: SessionState,
}

impl Client {
    fn build_http_client(config: &Config) -> Result<reqwest::Client> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(CONTENT_TYPE_XML));
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static(CONTENT_TYPE_XML),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    /// Opens an API session, returning an error if it cannot be opened.
    ///
    /// # Errors
    /// Returns an error if the gateway can't be reached or rejects the credentials.
    #[instrument(skip(config), fields(company = %config.credentials.company_id, user = %config.credentials.user_id))]
    pub async fn authenticate(config: Config) -> Result<Self> {
        let http = Self::build_http_client(&config)?;
        let session = Self::open_session(&http, &config).await?;
        info!(endpoint = %session.endpoint, "API session opened");
        Ok(Self {
            config,
            state: SessionState::Open { http, session },
        })
    }

    /// Opens an API session, capturing any failure instead of returning it.
    ///
    /// Check [`Client::success`] and [`Client::error`] afterwards; queries on a
    /// client that failed to authenticate return [`Error::NoSession`].
    #[instrument(skip(config), fields(company = %config.credentials.company_id, user = %config.credentials.user_id))]
    pub async fn connect(config: Config) -> Self {
        match Self::authenticate(config.clone()).await {
            Ok(client) => client,
            Err(e) => {
                error!("failed to open API session: {e}");
                Self {
                    config,
                    state: SessionState::Failed(Arc::new(e)),
                }
            }
        }
    }

    /// Checks a login by reading `LOCATIONENTITY` with it. Never returns an error.
    #[instrument(skip(config), fields(company = %config.credentials.company_id, user = %config.credentials.user_id))]
    pub async fn check_credentials(config: &Config) -> CredentialCheck {
        let outcome: Result<FunctionResult> = async {
            let http = Self::build_http_client(config)?;
            let function = Function::from(ReadByQuery::new(ENTITY_OBJECT).with_page_size(config.page_size));
            Self::post(
                &http,
                config,
                &config.endpoint,
                Authentication::Login(&config.credentials),
                &function,
            )
            .await
        }
        .await;

        match outcome {
            Ok(_) => CredentialCheck {
                success: true,
                error: None,
            },
            Err(e) => {
                warn!("credential check failed: {e}");
                CredentialCheck {
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn open_session(http: &reqwest::Client, config: &Config) -> Result<Session> {
        let function = Function::GetApiSession;
        let result = Self::post(
            http,
            config,
            &config.endpoint,
            Authentication::Login(&config.credentials),
            &function,
        )
        .await?;
        Session::from_result(&result, &config.endpoint)
    }

    /// Send one function and decode its result.
    async fn post(
        http: &reqwest::Client,
        config: &Config,
        endpoint: &GatewayEndpoint,
        authentication: Authentication<'_>,
        function: &Function,
    ) -> Result<FunctionResult> {
        let url = endpoint.to_url()?;
        let request = Request::new(config, authentication, function);
        let body = request.to_xml()?;
        debug!(
            function = function.name(),
            control_id = request.control_id(),
            %url,
            "posting gateway request"
        );

        let response = http.post(url.clone()).body(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("Response body size: {} bytes", text.len());
        tracing::trace!("Response text:\n{}", text);

        if status != StatusCode::OK {
            error!("Unexpected status code: {}", status);
            return Err(Error::HttpStatus {
                status_code: status,
                url: url.to_string(),
                response_body: Some(text),
            });
        }

        let result = Response::parse(&text)?.into_result()?;
        if result.function != function.name() {
            debug!(expected = function.name(), got = %result.function, "result names a different function");
        }
        Ok(result)
    }

    /// Whether the API session was opened.
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self.state, SessionState::Open { .. })
    }

    /// The error captured while opening the session, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match &self.state {
            SessionState::Failed(e) => Some(e.as_ref()),
            SessionState::Open { .. } => None,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Open { session, .. } => Some(session),
            SessionState::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session().map(|session| session.id.as_str())
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one function under the open session.
    #[instrument(skip(self, function), fields(function = function.name()))]
    pub async fn call(&self, function: Function) -> Result<FunctionResult> {
        let SessionState::Open { http, session } = &self.state else {
            return Err(Error::NoSession);
        };
        let endpoint = if self.config.use_session_endpoint {
            &session.endpoint
        } else {
            &self.config.endpoint
        };
        Self::post(
            http,
            &self.config,
            endpoint,
            Authentication::Session(&session.id),
            &function,
        )
        .await
    }

    /// Run a `readByQuery` and return one page of generic records.
    #[instrument(skip(self))]
    pub async fn read_by_query(&self, query: ReadByQuery) -> Result<Page<Record>> {
        let result = self.call(query.into()).await?;
        Ok(Page::from_result(&result))
    }

    /// Fetch the next page of a previous query.
    #[instrument(skip(self))]
    pub async fn read_more(&self, result_id: &str) -> Result<Page<Record>> {
        let result = self.call(ReadMore::new(result_id).into()).await?;
        Ok(Page::from_result(&result))
    }

    /// Account balances split by dimension, as generic records.
    #[instrument(skip(self))]
    pub async fn account_balances_by_dimensions(
        &self,
        parameters: DimensionBalanceParameters,
    ) -> Result<Vec<Record>> {
        let result = self.call(parameters.into()).await?;
        Ok(result.all_records())
    }

    /// A single page of `T` rows.
    pub(crate) async fn query_page<T: ObjectQuery>(&self) -> Result<Vec<T>> {
        let result = self.call(T::read_by_query(self.config.page_size).into()).await?;
        let rows: Vec<T> = result.rows();
        if let Some(data) = &result.data {
            if data.num_remaining > 0 {
                warn!(
                    object = T::OBJECT,
                    returned = rows.len(),
                    remaining = data.num_remaining,
                    "result truncated to one page"
                );
            }
        }
        Ok(rows)
    }

    /// Every `T` row, following `readMore` continuations.
    pub(crate) async fn query_all<T: ObjectQuery>(&self) -> Result<Vec<T>> {
        let mut result = self.call(T::read_by_query(self.config.page_size).into()).await?;
        let mut rows: Vec<T> = result.rows();
        let mut last_remaining: Option<u32> = None;

        loop {
            let Some(data) = &result.data else { break };
            if data.num_remaining == 0 {
                break;
            }
            // a continuation must shrink what is left
            if last_remaining.is_some_and(|last| data.num_remaining >= last) {
                warn!(
                    object = T::OBJECT,
                    remaining = data.num_remaining,
                    "readMore made no progress, stopping"
                );
                break;
            }
            let Some(result_id) = data.result_id.clone() else {
                warn!(object = T::OBJECT, "rows remain but no result id was returned");
                break;
            };
            last_remaining = Some(data.num_remaining);
            trace!(object = T::OBJECT, remaining = data.num_remaining, "reading more");
            result = self.call(ReadMore::new(result_id).into()).await?;
            let page: Vec<T> = result.rows();
            if page.is_empty() {
                break;
            }
            rows.extend(page);
        }

        debug!(object = T::OBJECT, count = rows.len(), "read all rows");
        Ok(rows)
    }

    /// Access the entities (active locations) API
    #[must_use]
    pub fn entities(&self) -> EntitiesApi {
        EntitiesApi { client: self }
    }

    /// Access the departments API
    #[must_use]
    pub fn departments(&self) -> DepartmentsApi {
        DepartmentsApi { client: self }
    }

    /// Access the GL accounts API
    #[must_use]
    pub fn accounts(&self) -> AccountsApi {
        AccountsApi { client: self }
    }

    /// Access the GL detail (ledger) API
    #[must_use]
    pub fn ledgers(&self) -> LedgersApi {
        LedgersApi { client: self }
    }

    /// Access the trial balance report
    #[must_use]
    pub fn trial_balances(&self) -> TrialBalancesApi {
        TrialBalancesApi { client: self }
    }
}

/// API handler for entities
#[derive(Debug)]
pub struct EntitiesApi<'a> {
    client: &'a Client,
}

impl EntitiesApi<'_> {
    /// Retrieve one page of active entities
    pub async fn list(&self) -> Result<Vec<Entity>> {
        entities::entity::list(self.client).await
    }

    /// Retrieve all active entities
    pub async fn list_all(&self) -> Result<Vec<Entity>> {
        entities::entity::list_all(self.client).await
    }
}

/// API handler for departments
#[derive(Debug)]
pub struct DepartmentsApi<'a> {
    client: &'a Client,
}

impl DepartmentsApi<'_> {
    /// Retrieve one page of departments
    pub async fn list(&self) -> Result<Vec<Department>> {
        entities::department::list(self.client).await
    }

    /// Retrieve all departments
    pub async fn list_all(&self) -> Result<Vec<Department>> {
        entities::department::list_all(self.client).await
    }
}

/// API handler for GL accounts
#[derive(Debug)]
pub struct AccountsApi<'a> {
    client: &'a Client,
}

impl AccountsApi<'_> {
    /// Retrieve one page of GL accounts
    pub async fn list(&self) -> Result<Vec<Account>> {
        entities::account::list(self.client).await
    }

    /// Retrieve all GL accounts
    pub async fn list_all(&self) -> Result<Vec<Account>> {
        entities::account::list_all(self.client).await
    }
}

/// API handler for GL detail lines
#[derive(Debug)]
pub struct LedgersApi<'a> {
    client: &'a Client,
}

impl LedgersApi<'_> {
    /// Retrieve one page of GL detail lines
    pub async fn list(&self) -> Result<Vec<LedgerEntry>> {
        entities::ledger::list(self.client).await
    }

    /// Retrieve all GL detail lines
    pub async fn list_all(&self) -> Result<Vec<LedgerEntry>> {
        entities::ledger::list_all(self.client).await
    }
}

/// API handler for the trial balance report
#[derive(Debug)]
pub struct TrialBalancesApi<'a> {
    client: &'a Client,
}

impl TrialBalancesApi<'_> {
    /// Trial balance for a department and location, from 1900-01-01 through today.
    pub async fn get(&self, department_id: &str, location_id: &str) -> Result<Vec<TrialBalance>> {
        self.get_with(TrialBalanceParameters::new(department_id, location_id))
            .await
    }

    /// Trial balance with explicit parameters, e.g. a different date range.
    pub async fn get_with(&self, parameters: TrialBalanceParameters) -> Result<Vec<TrialBalance>> {
        entities::trial_balance::get(self.client, parameters).await
    }
}
