use std::fmt;

use serde::Deserialize;

/// ISO currency with the number of minor-unit digits.
///
/// Two currencies are the same when their codes match.
#[derive(Debug, Clone, Eq, Deserialize)]
pub struct Currency {
    code: String,
    #[serde(default = "default_digits")]
    digits: u32,
}

fn default_digits() -> u32 {
    2
}

impl Currency {
    pub fn new(code: impl Into<String>, digits: u32) -> Currency {
        Currency {
            code: code.into(),
            digits,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl std::hash::Hash for Currency {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_code() {
        assert_eq!(Currency::new("JPY", 0), Currency::new("JPY", 2));
        assert_ne!(Currency::new("USD", 2), Currency::new("EUR", 2));
        let ccy: Currency = serde_json::from_str(r#"{"code": "TWD"}"#).unwrap();
        assert_eq!(ccy.digits(), 2);
        assert_eq!(ccy.to_string(), "TWD");
    }
}
