//! CSV result file
//!
//! One row per ValidationResult under the fixed header
//! `System Type, IP Address, Protocol, Status, Details`.

use std::path::Path;

use log::info;

use crate::error::ReportError;
use crate::validation::ValidationResult;

pub const CSV_HEADER: [&str; 5] = [
    "System Type",
    "IP Address",
    "Protocol",
    "Status",
    "Details",
];

/// Write all results to `path`, overwriting any previous run
pub fn write_results(path: &Path, results: &[ValidationResult]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| match e.into_kind() {
        // from_path only fails on open; surface it with the path attached
        csv::ErrorKind::Io(io) => ReportError::CsvWrite(path.to_path_buf(), io),
        other => ReportError::Csv(csv::Error::from(std::io::Error::other(format!(
            "{:?}",
            other
        )))),
    })?;

    writer.write_record(CSV_HEADER)?;
    for result in results {
        writer.write_record([
            result.category.to_string(),
            result.address.clone(),
            result.protocol.to_string(),
            result.outcome.status_label().to_string(),
            result.detail.clone(),
        ])?;
    }
    writer.flush().map_err(|e| ReportError::CsvWrite(path.to_path_buf(), e))?;

    info!("Results saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{Category, Host};
    use crate::validation::results::{Outcome, Protocol, ValidationAttempt};
    use crate::validation::MISSING_CREDENTIALS_DETAIL;
    use std::time::Duration;

    fn result(
        address: &str,
        category: Category,
        protocol: Protocol,
        outcome: Outcome,
        detail: &str,
    ) -> ValidationResult {
        ValidationResult::from_attempt(
            &Host::new(address, category),
            protocol,
            ValidationAttempt::new(outcome, detail, Duration::from_millis(5)),
        )
    }

    #[test]
    fn test_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validation_results.csv");

        let results = vec![
            result("10.0.0.1", Category::Linux, Protocol::Ssh, Outcome::Success, "Success"),
            result(
                "10.0.0.2",
                Category::Windows,
                Protocol::Smb,
                Outcome::AuthFailed,
                "Authentication failed (wrong credentials)",
            ),
            result(
                "10.0.0.3",
                Category::Other,
                Protocol::Ssh,
                Outcome::UnknownError,
                MISSING_CREDENTIALS_DETAIL,
            ),
        ];
        write_results(&path, &results).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "System Type,IP Address,Protocol,Status,Details");
        assert_eq!(lines[1], "Linux,10.0.0.1,SSH,Success,Success");
        assert_eq!(
            lines[2],
            "Windows,10.0.0.2,SMB,Failed,Authentication failed (wrong credentials)"
        );
        assert_eq!(lines[3], "Others,10.0.0.3,SSH,Failed,Missing credentials");
    }

    #[test]
    fn test_unwritable_path_is_report_error() {
        let results = Vec::new();
        let err = write_results(Path::new("/nonexistent/dir/out.csv"), &results).unwrap_err();
        assert!(matches!(err, ReportError::CsvWrite(..) | ReportError::Csv(_)));
    }
}
