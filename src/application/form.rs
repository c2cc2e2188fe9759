//! Form controller for the loan calculator.
//!
//! Holds the raw field input, the validation errors from the last attempt,
//! and the loading/error/result state of the calculation call. Submission
//! is split into [`FormController::begin_submit`] and
//! [`FormController::finish_submit`] so the call itself can run off the UI
//! thread; [`FormController::submit`] runs both halves in place.

use crate::application::shared::{PaymentPublisher, PaymentReader};
use crate::domain::{
    validate, Field, FieldErrors, FormFields, LoanRequest, LoanResponse, LoanService, ServiceResult,
};
use tracing::{debug, info, warn};

/// What happened when a submission was started.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStart {
    /// Validation passed; the request must now be sent.
    Dispatched(LoanRequest),
    /// Validation failed; errors are stored on the controller.
    Invalid,
    /// A request is already in flight; nothing changed.
    Busy,
}

/// Final state of a synchronous [`FormController::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded,
    Failed,
    Invalid,
    Busy,
}

#[derive(Debug)]
pub struct FormController {
    fields: FormFields,
    errors: FieldErrors,
    loading: bool,
    api_error: Option<String>,
    result: Option<LoanResponse>,
    payment: PaymentPublisher,
}

impl FormController {
    pub fn new(payment: PaymentPublisher) -> Self {
        Self {
            fields: FormFields::default(),
            errors: FieldErrors::new(),
            loading: false,
            api_error: None,
            result: None,
            payment,
        }
    }

    /// Stores raw input for a field. Validation waits for the next submit.
    pub fn update_field(&mut self, field: Field, raw: impl Into<String>) {
        self.fields.set(field, raw);
    }

    pub fn field(&self, field: Field) -> &str {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn api_error(&self) -> Option<&str> {
        self.api_error.as_deref()
    }

    pub fn result(&self) -> Option<&LoanResponse> {
        self.result.as_ref()
    }

    pub fn term_max(&self) -> u32 {
        self.fields.term_max()
    }

    /// Reader for the monthly payment this controller publishes.
    pub fn payment_reader(&self) -> PaymentReader {
        self.payment.reader()
    }

    /// Validates the form and, if it passes, moves into the loading state.
    ///
    /// The caller is responsible for sending the returned request and then
    /// calling [`FormController::finish_submit`] exactly once.
    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.loading {
            debug!("submit ignored, calculation already in flight");
            return SubmitStart::Busy;
        }

        match validate(&self.fields) {
            Err(errors) => {
                debug!(count = errors.len(), "form failed validation");
                self.errors = errors;
                SubmitStart::Invalid
            }
            Ok(request) => {
                self.errors.clear();
                self.loading = true;
                self.api_error = None;
                self.result = None;
                self.payment.clear();
                info!(
                    loan_type = request.loan_type.label(),
                    amount = request.loan_amount,
                    term = request.term,
                    "dispatching loan calculation"
                );
                SubmitStart::Dispatched(request)
            }
        }
    }

    /// Applies the outcome of a dispatched request and leaves the loading state.
    pub fn finish_submit(&mut self, outcome: ServiceResult<LoanResponse>) {
        match outcome {
            Ok(response) => {
                info!(monthly_payment = response.monthly_payment, "loan calculation succeeded");
                self.payment.publish(Some(response.monthly_payment));
                self.result = Some(response);
                self.api_error = None;
            }
            Err(error) => {
                warn!(%error, "loan calculation failed");
                self.api_error = Some(error.user_message());
                self.result = None;
                self.payment.clear();
            }
        }
        self.loading = false;
    }

    /// Validates, calls `service` on the current thread and applies the outcome.
    pub fn submit(&mut self, service: &dyn LoanService) -> SubmitOutcome {
        match self.begin_submit() {
            SubmitStart::Busy => SubmitOutcome::Busy,
            SubmitStart::Invalid => SubmitOutcome::Invalid,
            SubmitStart::Dispatched(request) => {
                let outcome = service.calculate(&request);
                let succeeded = outcome.is_ok();
                self.finish_submit(outcome);
                if succeeded {
                    SubmitOutcome::Succeeded
                } else {
                    SubmitOutcome::Failed
                }
            }
        }
    }

    /// Empties the form, its errors and the error banner.
    ///
    /// The last result and the shared payment stay until the next submission.
    pub fn reset(&mut self) {
        self.fields = FormFields::default();
        self.errors.clear();
        self.api_error = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::shared::shared_payment;
    use crate::domain::{Breakdown, ServiceError};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Records every request and answers with a canned outcome.
    pub(crate) struct StubService {
        pub requests: Mutex<Vec<LoanRequest>>,
        respond: Box<dyn Fn() -> ServiceResult<LoanResponse> + Send + Sync>,
    }

    impl StubService {
        pub fn ok(response: LoanResponse) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                respond: Box::new(move || Ok(response.clone())),
            }
        }

        pub fn rejecting(message: &str) -> Self {
            let message = message.to_string();
            Self {
                requests: Mutex::new(Vec::new()),
                respond: Box::new(move || {
                    Err(ServiceError::Rejected { status: 500, message: Some(message.clone()) })
                }),
            }
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl LoanService for StubService {
        fn calculate(&self, request: &LoanRequest) -> ServiceResult<LoanResponse> {
            self.requests.lock().unwrap().push(request.clone());
            (self.respond)()
        }
    }

    pub(crate) fn sample_response() -> LoanResponse {
        LoanResponse {
            monthly_payment: 1896.2,
            total_payment: 682632.0,
            total_interest: 382632.0,
            breakdown: Breakdown {
                loan_amount: 300000.0,
                term: 30.0,
                base_rate: 0.065,
                adjusted_rate: 0.0725,
                credit_multiplier: 1.05,
                house_age_multiplier: 1.0,
                house_age_category: "New".to_string(),
                term_in_months: 360.0,
            },
        }
    }

    pub(crate) fn filled_controller() -> FormController {
        let (publisher, _) = shared_payment();
        let mut form = FormController::new(publisher);
        form.update_field(Field::LoanType, "Fixed");
        form.update_field(Field::LoanAmount, "300000");
        form.update_field(Field::Term, "30");
        form.update_field(Field::CreditScore, "Good");
        form.update_field(Field::HouseAge, "5");
        form
    }

    #[test]
    fn test_update_field_does_not_validate() {
        let (publisher, _) = shared_payment();
        let mut form = FormController::new(publisher);
        form.update_field(Field::LoanAmount, "-5");

        assert_eq!(form.field(Field::LoanAmount), "-5");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_successful_submit_publishes_payment() {
        let mut form = filled_controller();
        let reader = form.payment_reader();
        let service = StubService::ok(sample_response());

        assert_eq!(form.submit(&service), SubmitOutcome::Succeeded);

        assert_eq!(reader.get(), Some(1896.2));
        assert_eq!(form.result(), Some(&sample_response()));
        assert_eq!(form.api_error(), None);
        assert!(!form.is_loading());

        let sent = service.requests.lock().unwrap();
        assert_eq!(
            serde_json::to_value(&sent[0]).unwrap(),
            serde_json::json!({
                "loanType": "Fixed Rate",
                "loanAmount": 300000,
                "term": 30,
                "creditScore": "Good",
                "houseAge": 5
            })
        );
    }

    #[test]
    fn test_invalid_form_makes_no_call() {
        let mut form = filled_controller();
        form.update_field(Field::LoanType, "InterestOnly");
        form.update_field(Field::Term, "15");
        let service = StubService::ok(sample_response());

        assert_eq!(form.submit(&service), SubmitOutcome::Invalid);

        assert_eq!(service.call_count(), 0);
        assert_eq!(form.error(Field::Term), Some("1-10"));
        assert!(!form.is_loading());
    }

    #[test]
    fn test_failed_submit_clears_result_and_payment() {
        let mut form = filled_controller();
        let reader = form.payment_reader();

        form.submit(&StubService::ok(sample_response()));
        assert_eq!(reader.get(), Some(1896.2));

        let outcome = form.submit(&StubService::rejecting("Server error"));

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(form.api_error(), Some("Server error"));
        assert_eq!(form.result(), None);
        assert_eq!(reader.get(), None);
        assert!(!form.is_loading());
    }

    #[test]
    fn test_begin_submit_enters_loading_and_clears_previous_state() {
        let mut form = filled_controller();
        let reader = form.payment_reader();
        form.submit(&StubService::ok(sample_response()));

        let start = form.begin_submit();

        assert!(matches!(start, SubmitStart::Dispatched(_)));
        assert!(form.is_loading());
        assert_eq!(form.result(), None);
        assert_eq!(form.api_error(), None);
        assert_eq!(reader.get(), None);
    }

    #[test]
    fn test_submit_while_loading_is_ignored() {
        let mut form = filled_controller();
        assert!(matches!(form.begin_submit(), SubmitStart::Dispatched(_)));

        let service = StubService::ok(sample_response());
        assert_eq!(form.submit(&service), SubmitOutcome::Busy);
        assert_eq!(service.call_count(), 0);
        assert!(form.is_loading());

        form.finish_submit(Err(ServiceError::WorkerLost));
        assert!(!form.is_loading());
        assert_eq!(form.api_error(), Some("Server error"));
    }

    #[test]
    fn test_fixing_errors_clears_them_on_next_submit() {
        let mut form = filled_controller();
        form.update_field(Field::HouseAge, "-1");
        form.submit(&StubService::ok(sample_response()));
        assert_eq!(form.error(Field::HouseAge), Some("≥ 0"));

        form.update_field(Field::HouseAge, "1");
        assert_eq!(form.submit(&StubService::ok(sample_response())), SubmitOutcome::Succeeded);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_reset_keeps_last_payment() {
        let mut form = filled_controller();
        let reader = form.payment_reader();
        form.submit(&StubService::ok(sample_response()));

        form.reset();

        assert_eq!(form.fields(), &FormFields::default());
        assert_eq!(reader.get(), Some(1896.2));
    }
}
