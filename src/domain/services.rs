//! The seam between the form and the remote calculation service.

use super::errors::ServiceResult;
use super::models::{LoanRequest, LoanResponse};

/// Something that can turn a validated request into a payment breakdown.
///
/// Implementations block until the calculation finishes; callers that must
/// stay responsive run them on a worker thread.
pub trait LoanService: Send + Sync {
    fn calculate(&self, request: &LoanRequest) -> ServiceResult<LoanResponse>;
}
