use crate::airports::SUGGESTION_LIMIT;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Form settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Maximum suggestions shown under a location field
    pub suggestion_limit: usize,
    /// Fixed "today" for the departure picker; the current UTC calendar date when unset
    pub today: Option<NaiveDate>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: SUGGESTION_LIMIT,
            today: None,
        }
    }
}

impl FormConfig {
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// First selectable departure date. Taken in UTC, so west of Greenwich the
    /// picker already moves to tomorrow during the local evening.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormConfig::default();
        assert_eq!(config.suggestion_limit, 5);
        assert!(config.today.is_none());
    }

    #[test]
    fn test_unset_today_follows_utc_date() {
        let config = FormConfig::default();
        let before = Utc::now().date_naive();
        let today = config.today();
        let after = Utc::now().date_naive();
        assert!(today == before || today == after);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: FormConfig = serde_json::from_str(r#"{"today": "2025-06-01"}"#).unwrap();
        assert_eq!(config.suggestion_limit, 5);
        assert_eq!(config.today(), NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }
}
