//! Brokerage account the tagged records are filed under.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Paper,
    Live,
}

impl AccountType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "paper" => Some(AccountType::Paper),
            "live" => Some(AccountType::Live),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Paper => "paper",
            AccountType::Live => "live",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub number: String,
    pub currency: String,
    pub account_type: AccountType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_account_type() {
        assert_eq!(AccountType::parse("paper"), Some(AccountType::Paper));
        assert_eq!(AccountType::parse(" LIVE "), Some(AccountType::Live));
        assert_eq!(AccountType::parse("margin"), None);
    }
}
