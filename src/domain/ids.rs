//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Federal agency / sub-agency code used to filter the opportunities search
///
/// # Examples
///
/// ```
/// use contract_fetcher::domain::ids::OrgCode;
/// use std::str::FromStr;
///
/// let code = OrgCode::from_str(" 070 ").unwrap();
/// assert_eq!(code.as_str(), "070");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgCode(String);

impl OrgCode {
    /// Creates a new OrgCode, trimming surrounding whitespace
    ///
    /// # Returns
    ///
    /// Returns `Err` if the code is empty after trimming
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err("Organization code cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parses a comma-separated list, skipping blank entries
    ///
    /// ```
    /// use contract_fetcher::domain::ids::OrgCode;
    ///
    /// let codes = OrgCode::parse_list("070, 097,,");
    /// assert_eq!(codes.len(), 2);
    /// ```
    pub fn parse_list(list: &str) -> Vec<Self> {
        list.split(',').filter_map(|s| Self::new(s).ok()).collect()
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrgCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for OrgCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_code_valid() {
        let code = OrgCode::new("070").unwrap();
        assert_eq!(code.as_str(), "070");
        assert_eq!(code.to_string(), "070");
    }

    #[test]
    fn test_org_code_empty() {
        assert!(OrgCode::new("").is_err());
        assert!(OrgCode::new("   ").is_err());
    }

    #[test]
    fn test_parse_list_preserves_order() {
        let codes = OrgCode::parse_list("097,070, 021");
        let codes: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["097", "070", "021"]);
    }

    #[test]
    fn test_parse_list_empty() {
        assert!(OrgCode::parse_list("").is_empty());
        assert!(OrgCode::parse_list(" , ,").is_empty());
    }
}
