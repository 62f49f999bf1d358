//! JSON engine configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use sfc_classify::types::ClassifyConfig;

use crate::error::{FileError, FileResult};

/// Loads a [`ClassifyConfig`] from JSON. Missing keys take their defaults.
pub fn load_config(path: impl AsRef<Path>) -> FileResult<ClassifyConfig> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FileError::io(path, e.to_string()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| FileError::parse(path, Some(e.line() as u64), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfc_core::Currency;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "parallel": false, "reporting_currency": "HKD", "investment_grade_threshold": 11 }}"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert!(!config.parallel);
        assert_eq!(config.reporting_currency, Currency::HKD);
        assert_eq!(config.investment_grade_threshold, 11);
        assert_eq!(config.money_market_country, "HK");
        assert_eq!(config.private_security_marker, "*");
    }

    #[test]
    fn test_load_config_errors() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(load_config(file.path()), Err(FileError::Parse { .. })));
        assert!(matches!(
            load_config("/nonexistent/config.json"),
            Err(FileError::Io { .. })
        ));
    }
}
