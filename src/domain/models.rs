use serde::{Deserialize, Serialize, Serializer};

/// The repayment structure of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoanType {
    #[serde(rename = "Fixed Rate")]
    FixedRate,
    #[serde(rename = "Variable Rate")]
    VariableRate,
    #[serde(rename = "Interest Only")]
    InterestOnly,
}

impl LoanType {
    pub const ALL: [LoanType; 3] = [LoanType::FixedRate, LoanType::VariableRate, LoanType::InterestOnly];

    /// Value used by the form for this loan type.
    pub fn option_value(self) -> &'static str {
        match self {
            LoanType::FixedRate => "Fixed",
            LoanType::VariableRate => "Variable",
            LoanType::InterestOnly => "InterestOnly",
        }
    }

    /// Human-readable name, identical to the name sent to the service.
    pub fn label(self) -> &'static str {
        match self {
            LoanType::FixedRate => "Fixed Rate",
            LoanType::VariableRate => "Variable Rate",
            LoanType::InterestOnly => "Interest Only",
        }
    }

    pub fn from_option_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.option_value() == value)
    }

    /// Longest term in years the service accepts for this loan type.
    pub fn term_max(self) -> u32 {
        match self {
            LoanType::InterestOnly => 10,
            _ => 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CreditScore {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl CreditScore {
    pub const ALL: [CreditScore; 4] = [
        CreditScore::Excellent,
        CreditScore::Good,
        CreditScore::Fair,
        CreditScore::Poor,
    ];

    pub fn option_value(self) -> &'static str {
        match self {
            CreditScore::Excellent => "Excellent",
            CreditScore::Good => "Good",
            CreditScore::Fair => "Fair",
            CreditScore::Poor => "Poor",
        }
    }

    pub fn from_option_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.option_value() == value)
    }
}

/// A validated calculation request, ready to be sent to the loan service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub loan_type: LoanType,
    #[serde(serialize_with = "serialize_number")]
    pub loan_amount: f64,
    pub term: u32,
    pub credit_score: CreditScore,
    #[serde(serialize_with = "serialize_number")]
    pub house_age: f64,
}

/// The service's answer to a [`LoanRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResponse {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub breakdown: Breakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub loan_amount: f64,
    pub term: f64,
    pub base_rate: f64,
    pub adjusted_rate: f64,
    pub credit_multiplier: f64,
    pub house_age_multiplier: f64,
    pub house_age_category: String,
    pub term_in_months: f64,
}

/// Writes whole-valued floats as JSON integers so `300000.0` goes out as `300000`.
fn serialize_number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
