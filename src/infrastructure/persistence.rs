use crate::domain::LoanResponse;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct ResultExporter;

impl ResultExporter {
    /// Writes the calculation result as `field,value` rows.
    pub fn export_to_csv(result: &LoanResponse, filename: &str) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_path(Path::new(filename))?;
        Self::write_rows(result, &mut writer)?;
        writer.flush()?;
        Ok(filename.to_string())
    }

    fn write_rows<W: io::Write>(result: &LoanResponse, writer: &mut csv::Writer<W>) -> Result<(), ExportError> {
        let b = &result.breakdown;
        writer.write_record(["field", "value"])?;
        for (field, value) in [
            ("monthlyPayment", result.monthly_payment.to_string()),
            ("totalPayment", result.total_payment.to_string()),
            ("totalInterest", result.total_interest.to_string()),
            ("loanAmount", b.loan_amount.to_string()),
            ("term", b.term.to_string()),
            ("baseRate", b.base_rate.to_string()),
            ("adjustedRate", b.adjusted_rate.to_string()),
            ("creditMultiplier", b.credit_multiplier.to_string()),
            ("houseAgeMultiplier", b.house_age_multiplier.to_string()),
            ("houseAgeCategory", b.house_age_category.clone()),
            ("termInMonths", b.term_in_months.to_string()),
        ] {
            writer.write_record([field, value.as_str()])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::form::tests::sample_response;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_every_breakdown_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("breakdown.csv");
        let filename = path.to_str().unwrap();

        let written = ResultExporter::export_to_csv(&sample_response(), filename).unwrap();
        assert_eq!(written, filename);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "field,value");
        assert_eq!(lines[1], "monthlyPayment,1896.2");
        assert_eq!(lines[5], "term,30");
        assert_eq!(lines[10], "houseAgeCategory,New");
        assert_eq!(lines[11], "termInMonths,360");
        assert_eq!(lines.len(), 12);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("breakdown.csv");

        let result = ResultExporter::export_to_csv(&sample_response(), path.to_str().unwrap());
        assert!(result.is_err());
    }
}
