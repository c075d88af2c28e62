//! Domain error types.

/// Top-level error type for tradetagger.
#[derive(Debug, thiserror::Error)]
pub enum TradeTaggerError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid input in {file}: {reason}")]
    Input { file: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradeTaggerError> for std::process::ExitCode {
    fn from(err: &TradeTaggerError) -> Self {
        let code: u8 = match err {
            TradeTaggerError::Io(_) | TradeTaggerError::Input { .. } => 1,
            TradeTaggerError::ConfigParse { .. }
            | TradeTaggerError::ConfigMissing { .. }
            | TradeTaggerError::ConfigInvalid { .. } => 2,
            TradeTaggerError::Database { .. } | TradeTaggerError::DatabaseQuery { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_section_and_key() {
        let err = TradeTaggerError::ConfigMissing {
            section: "account".into(),
            key: "number".into(),
        };
        assert_eq!(err.to_string(), "missing config key [account] number");
    }

    #[test]
    fn input_error_names_file() {
        let err = TradeTaggerError::Input {
            file: "orders.json".into(),
            reason: "expected array".into(),
        };
        assert_eq!(err.to_string(), "invalid input in orders.json: expected array");
    }
}
