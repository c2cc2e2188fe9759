use crate::domain::{LoanResponse, LoanType};

/// `1896.2` → `$1896.20`
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Rates arrive as fractions: `0.065` → `6.50%`
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// The three headline figures of a result.
pub fn summary_lines(result: &LoanResponse) -> Vec<String> {
    vec![
        format!("Monthly Payment: {}", format_currency(result.monthly_payment)),
        format!("Total Payment: {}", format_currency(result.total_payment)),
        format!("Total Interest: {}", format_currency(result.total_interest)),
    ]
}

/// The breakdown list, in the order the service documents it.
pub fn breakdown_lines(result: &LoanResponse) -> Vec<String> {
    let b = &result.breakdown;
    vec![
        format!("Loan Amount: {}", format_currency(b.loan_amount)),
        format!("Term: {} years", b.term),
        format!("Base Interest Rate: {}", format_percent(b.base_rate)),
        format!("Adjusted Interest Rate: {}", format_percent(b.adjusted_rate)),
        format!("Credit Score Multiplier: {}", b.credit_multiplier),
        format!("House Age Multiplier: {}", b.house_age_multiplier),
        format!("House Age Category: {}", b.house_age_category),
        format!("Term in months: {}", b.term_in_months),
    ]
}

/// Text shown in a choice field for its raw value.
pub fn choice_display(raw: &str) -> String {
    if raw.is_empty() {
        return "Select".to_string();
    }
    LoanType::from_option_value(raw)
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| raw.to_string())
}
