//! INI file configuration adapter.

use crate::domain::error::TradeTaggerError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TradeTaggerError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TradeTaggerError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TradeTaggerError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TradeTaggerError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[input]
orders = /var/lib/tradetagger/orders.json
format = json

[poller]
from_date = 2026-02-26
interval_secs = 60

[account]
number = PA3XYZ
type = paper

[sqlite]
path = trades.db
pool_size = 2
"#;

    #[test]
    fn reads_strings_across_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("input", "orders"),
            Some("/var/lib/tradetagger/orders.json".to_string())
        );
        assert_eq!(adapter.get_string("account", "number"), Some("PA3XYZ".to_string()));
        assert_eq!(adapter.get_string("account", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_int("poller", "interval_secs", 0), 60);
        assert_eq!(adapter.get_int("sqlite", "pool_size", 4), 2);
        assert_eq!(adapter.get_int("poller", "missing", 42), 42);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[poller]\ninterval_secs = soon\n").unwrap();
        assert_eq!(adapter.get_int("poller", "interval_secs", 60), 60);
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("sqlite", "path"), Some("trades.db".to_string()));
    }

    #[test]
    fn from_file_missing_file_is_config_parse_error() {
        match FileConfigAdapter::from_file("/nonexistent/tradetagger.ini") {
            Err(TradeTaggerError::ConfigParse { file, .. }) => {
                assert_eq!(file, "/nonexistent/tradetagger.ini");
            }
            Err(other) => panic!("expected ConfigParse, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }
}
