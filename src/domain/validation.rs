//! Client-side validation of the loan form.
//!
//! Validation is a pure function from raw field strings to either a
//! normalized [`LoanRequest`] or a map of per-field messages. Every field
//! is checked on every call so the user sees all problems at once.

use super::models::{CreditScore, LoanRequest, LoanType};
use std::collections::BTreeMap;

pub const REQUIRED: &str = "Required";
pub const POSITIVE_NUMBER: &str = "Positive number";
pub const NON_NEGATIVE: &str = "≥ 0";
pub const INVALID_LOAN_TYPE: &str = "Invalid loan type";
pub const INVALID_CREDIT_SCORE: &str = "Invalid credit score";

/// The inputs of the loan form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    LoanType,
    LoanAmount,
    Term,
    CreditScore,
    HouseAge,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::LoanType,
        Field::LoanAmount,
        Field::Term,
        Field::CreditScore,
        Field::HouseAge,
    ];

    /// Wire name of the field, as used in the request body.
    pub fn name(self) -> &'static str {
        match self {
            Field::LoanType => "loanType",
            Field::LoanAmount => "loanAmount",
            Field::Term => "term",
            Field::CreditScore => "creditScore",
            Field::HouseAge => "houseAge",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::LoanType => "Loan Type",
            Field::LoanAmount => "Loan Amount ($)",
            Field::Term => "Term (years)",
            Field::CreditScore => "Credit Score",
            Field::HouseAge => "House Age (years)",
        }
    }

    /// Allowed values for fields picked from a fixed list, `None` for free text.
    pub fn options(self) -> Option<Vec<&'static str>> {
        match self {
            Field::LoanType => Some(LoanType::ALL.iter().map(|t| t.option_value()).collect()),
            Field::CreditScore => Some(CreditScore::ALL.iter().map(|s| s.option_value()).collect()),
            _ => None,
        }
    }

    pub fn is_choice(self) -> bool {
        self.options().is_some()
    }
}

/// Raw, unvalidated form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub loan_type: String,
    pub loan_amount: String,
    pub term: String,
    pub credit_score: String,
    pub house_age: String,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::LoanType => &self.loan_type,
            Field::LoanAmount => &self.loan_amount,
            Field::Term => &self.term,
            Field::CreditScore => &self.credit_score,
            Field::HouseAge => &self.house_age,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::LoanType => &mut self.loan_type,
            Field::LoanAmount => &mut self.loan_amount,
            Field::Term => &mut self.term,
            Field::CreditScore => &mut self.credit_score,
            Field::HouseAge => &mut self.house_age,
        };
        *slot = value.into();
    }

    /// Upper bound for the term, derived from the raw loan type.
    pub fn term_max(&self) -> u32 {
        match LoanType::from_option_value(self.loan_type.trim()) {
            Some(loan_type) => loan_type.term_max(),
            None => LoanType::FixedRate.term_max(),
        }
    }
}

/// Per-field validation messages, ordered like the form.
pub type FieldErrors = BTreeMap<Field, String>;

/// Validates the form and builds the request that would be sent.
///
/// # Examples
///
/// ```
/// use loancalc::domain::{validate, Field, FormFields};
///
/// let mut fields = FormFields::default();
/// fields.set(Field::LoanType, "InterestOnly");
/// fields.set(Field::Term, "15");
///
/// let errors = validate(&fields).unwrap_err();
/// assert_eq!(errors[&Field::Term], "1-10");
/// assert_eq!(errors[&Field::LoanAmount], "Required");
/// ```
pub fn validate(fields: &FormFields) -> Result<LoanRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    let term_max = fields.term_max();

    let loan_type = required(fields, Field::LoanType, &mut errors).and_then(|raw| {
        LoanType::from_option_value(raw).or_else(|| {
            errors.insert(Field::LoanType, INVALID_LOAN_TYPE.to_string());
            None
        })
    });

    let loan_amount = required(fields, Field::LoanAmount, &mut errors).and_then(|raw| {
        match parse_number(raw) {
            Some(amount) if amount > 0.0 => Some(amount),
            _ => {
                errors.insert(Field::LoanAmount, POSITIVE_NUMBER.to_string());
                None
            }
        }
    });

    let term = required(fields, Field::Term, &mut errors).and_then(|raw| {
        match parse_number(raw) {
            Some(years) if years.fract() == 0.0 && years >= 1.0 && years <= term_max as f64 => {
                Some(years as u32)
            }
            _ => {
                errors.insert(Field::Term, format!("1-{term_max}"));
                None
            }
        }
    });

    let credit_score = required(fields, Field::CreditScore, &mut errors).and_then(|raw| {
        CreditScore::from_option_value(raw).or_else(|| {
            errors.insert(Field::CreditScore, INVALID_CREDIT_SCORE.to_string());
            None
        })
    });

    let house_age = required(fields, Field::HouseAge, &mut errors).and_then(|raw| {
        match parse_number(raw) {
            Some(age) if age >= 0.0 => Some(age),
            _ => {
                errors.insert(Field::HouseAge, NON_NEGATIVE.to_string());
                None
            }
        }
    });

    match (loan_type, loan_amount, term, credit_score, house_age) {
        (Some(loan_type), Some(loan_amount), Some(term), Some(credit_score), Some(house_age))
            if errors.is_empty() =>
        {
            Ok(LoanRequest {
                loan_type,
                loan_amount,
                term,
                credit_score,
                house_age,
            })
        }
        _ => Err(errors),
    }
}

fn required<'a>(fields: &'a FormFields, field: Field, errors: &mut FieldErrors) -> Option<&'a str> {
    let raw = fields.get(field).trim();
    if raw.is_empty() {
        errors.insert(field, REQUIRED.to_string());
        None
    } else {
        Some(raw)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}
