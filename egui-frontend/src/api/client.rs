//! # API Client
//!
//! One method per REST endpoint. Connect errors are retried according to the
//! `RetryPolicy`; a timeout is retried only for GET, since a POST, PUT or
//! DELETE that timed out may already have been applied. HTTP error responses
//! are returned at once as `ApiError::Status` carrying the server's error detail.

use log::{debug, info};
use reqwest::blocking::{Client, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{ErrorResponse, HealthResponse, Invoice, InvoiceRequest, MessageResponse, Organization, OrganizationRequest};
use std::time::Duration;
use thiserror::Error;

use crate::api::retry::run_with_retry;
use crate::api::RetryPolicy;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Could not reach the server after {attempts} attempt(s): {message}")]
    TransportFailure { attempts: u32, message: String },

    #[error("Server returned {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

/// Blocking client bound to one server
pub struct ApiClient {
    base_url: String,
    http: Client,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, retry: RetryPolicy) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, retry, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, retry: RetryPolicy, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder().timeout(timeout).build()?;

        info!(
            "API client for {} ({} attempts, {:?} apart, {:?} timeout)",
            base_url, retry.max_attempts, retry.delay, timeout
        );
        Ok(Self { base_url, http, retry })
    }

    /// Client configured from `INVOICE_API_URL` and the retry variables
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("INVOICE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url, RetryPolicy::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn health(&self) -> ApiResult<HealthResponse> {
        self.send(Method::GET, "/health", None::<&()>)
    }

    pub fn list_organizations(&self) -> ApiResult<Vec<Organization>> {
        self.send(Method::GET, "/organizations/", None::<&()>)
    }

    pub fn get_organization(&self, id: i64) -> ApiResult<Organization> {
        self.send(Method::GET, &format!("/organizations/{}", id), None::<&()>)
    }

    pub fn create_organization(&self, request: &OrganizationRequest) -> ApiResult<Organization> {
        self.send(Method::POST, "/organizations/", Some(request))
    }

    pub fn update_organization(&self, id: i64, request: &OrganizationRequest) -> ApiResult<Organization> {
        self.send(Method::PUT, &format!("/organizations/{}", id), Some(request))
    }

    pub fn delete_organization(&self, id: i64) -> ApiResult<MessageResponse> {
        self.send(Method::DELETE, &format!("/organizations/{}", id), None::<&()>)
    }

    pub fn list_invoices(&self) -> ApiResult<Vec<Invoice>> {
        self.send(Method::GET, "/invoices/", None::<&()>)
    }

    pub fn get_invoice(&self, id: i64) -> ApiResult<Invoice> {
        self.send(Method::GET, &format!("/invoices/{}", id), None::<&()>)
    }

    pub fn create_invoice(&self, request: &InvoiceRequest) -> ApiResult<Invoice> {
        self.send(Method::POST, "/invoices/", Some(request))
    }

    pub fn update_invoice(&self, id: i64, request: &InvoiceRequest) -> ApiResult<Invoice> {
        self.send(Method::PUT, &format!("/invoices/{}", id), Some(request))
    }

    pub fn delete_invoice(&self, id: i64) -> ApiResult<MessageResponse> {
        self.send(Method::DELETE, &format!("/invoices/{}", id), None::<&()>)
    }

    fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let retry_timeouts = method == Method::GET;
        debug!("{} {}", method, url);

        let response = run_with_retry(
            &self.retry,
            || {
                let mut request = self.http.request(method.clone(), &url);
                if let Some(body) = body {
                    request = request.json(body);
                }
                request.send()
            },
            |e: &reqwest::Error| e.is_connect() || (retry_timeouts && e.is_timeout()),
        )
        .map_err(|failure| ApiError::TransportFailure {
            attempts: failure.attempts,
            message: failure.error.to_string(),
        })?;

        decode(response)
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().unwrap_or_default();
        let detail = serde_json::from_str::<ErrorResponse>(&text)
            .map(|body| body.detail)
            .unwrap_or(text);
        return Err(ApiError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    response.json::<T>().map_err(|e| ApiError::Decode(e.to_string()))
}
