// # ASCIO SOAP Client
//
// Registrar client for the ASCIO v3 SOAP API.
//
// ## Behaviour
//
// - One HTTP POST per trait call, no retries (the engine decides what to do
//   with a failure)
// - HTTP timeout of 60 seconds
// - The request body is handed to the injected `RequestLog` BEFORE the
//   security header is added, so credentials never reach a log
// - SOAP faults, HTTP failures and unparsable answers are transport errors;
//   a result with a failure code is returned as a normal response
//
// ## API Reference
//
// - Endpoint: `https://aws.ascio.com/v3/aws.svc`
// - Methods: `GetDomains`, `CreateOrder`, `AvailabilityInfo`
// - Action header: `http://www.ascio.com/2013/02/IAscioService/<Method>`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regsync_core::traits::{
    AvailabilityInfoResponse, CreateOrderResponse, DomainQuery, GetDomainsResponse, OrderRequest,
    RegistrarClient, RequestLog, TracingRequestLog,
};
use regsync_core::{Credentials, Error, Result};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;

use crate::response;
use crate::soap;
use crate::xml::{self, Node};

/// Production endpoint of the v3 API
pub const ASCIO_ENDPOINT: &str = "https://aws.ascio.com/v3/aws.svc";

/// Default HTTP timeout for SOAP calls (60 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// ASCIO v3 registrar client
///
/// The client holds no credentials; every call receives them from the
/// engine. The Debug implementation shows the endpoint only.
pub struct AscioClient {
    endpoint: String,
    client: reqwest::Client,
    request_log: Arc<dyn RequestLog>,
}

impl std::fmt::Debug for AscioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AscioClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl AscioClient {
    /// Create a client for an endpoint
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an empty endpoint or when the HTTP client
    /// cannot be built.
    pub fn new(endpoint: impl Into<String>, request_log: Arc<dyn RequestLog>) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(Error::config("Registrar endpoint cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            client,
            request_log,
        })
    }

    /// Client for the production endpoint without request logging
    pub fn production() -> Result<Self> {
        Self::new(ASCIO_ENDPOINT, Arc::new(TracingRequestLog::disabled()))
    }

    /// Endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one SOAP call and return the `<Method>Result` element
    async fn call(&self, method: &str, credentials: &Credentials, body: &str) -> Result<Node> {
        self.request_log.log_request(method, body);
        tracing::debug!("Calling registrar method {}", method);

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .header("SOAPAction", soap::soap_action(method))
            .body(soap::envelope(credentials, body))
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            // Faults arrive with a 500; their reason beats the status line
            if let Ok(document) = xml::parse(&text)
                && let Some(reason) = response::fault(&document)
            {
                return Err(Error::transport(format!("SOAP fault: {}", reason)));
            }
            return Err(status_error(status, &text));
        }

        response::parse_result(&text, method)
    }
}

/// Map a failed HTTP status to a transport error
fn status_error(status: StatusCode, body: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::transport(format!(
            "Authentication failed: registrar refused the account. Status: {}",
            status
        )),
        404 => Error::transport(format!("Registrar endpoint not found. Status: {}", status)),
        429 => Error::transport(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => Error::transport(format!(
            "Registrar server error (transient): {} - {}",
            status, body
        )),
        _ => Error::transport(format!("Registrar call failed: {} - {}", status, body)),
    }
}

#[async_trait]
impl RegistrarClient for AscioClient {
    async fn get_domains(
        &self,
        credentials: &Credentials,
        query: &DomainQuery,
    ) -> Result<GetDomainsResponse> {
        let result = self
            .call("GetDomains", credentials, &soap::get_domains_body(query))
            .await?;
        response::get_domains(&result)
    }

    async fn create_order(
        &self,
        credentials: &Credentials,
        request: &OrderRequest,
    ) -> Result<CreateOrderResponse> {
        tracing::info!(
            "Sending {} order for {}",
            request.order_type,
            request.domain.name
        );
        let result = self
            .call("CreateOrder", credentials, &soap::create_order_body(request))
            .await?;
        response::create_order(&result)
    }

    async fn availability_info(
        &self,
        credentials: &Credentials,
        domain: &str,
    ) -> Result<AvailabilityInfoResponse> {
        let result = self
            .call("AvailabilityInfo", credentials, &soap::availability_info_body(domain))
            .await?;
        response::availability_info(&result)
    }

    fn registrar_name(&self) -> &'static str {
        "ascio"
    }
}
