//! HTTP client for the remote loan calculation service.

use crate::domain::{LoanRequest, LoanResponse, LoanService, ServiceError, ServiceResult};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_SERVICE_URL: &str = "https://home-loan.matthayward.workers.dev";

/// Body the service sends alongside a non-2xx status.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Calls `POST {base_url}/calculate` with a JSON request body.
///
/// No timeout is applied and failures are never retried; a request
/// runs until the service answers or the connection fails.
#[derive(Debug, Clone)]
pub struct HttpLoanService {
    client: Client,
    endpoint: String,
}

impl HttpLoanService {
    pub fn new(base_url: &str) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: calculate_url(base_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LoanService for HttpLoanService {
    fn calculate(&self, request: &LoanRequest) -> ServiceResult<LoanResponse> {
        debug!(endpoint = %self.endpoint, "sending calculation request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            warn!(status = status.as_u16(), ?message, "calculation rejected");
            return Err(ServiceError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| ServiceError::Malformed(e.to_string()))
    }
}

fn calculate_url(base_url: &str) -> String {
    format!("{}/calculate", base_url.trim_end_matches('/'))
}
