//! `getWebhookInfo` result, used by webhook setup reconciliation (§4.5).

use serde::{Deserialize, Serialize};

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebhookInfo {
    pub url: String,
    pub has_custom_certificate: bool,
    pub pending_update_count: i32,
    pub ip_address: Option<String>,
    pub last_error_date: Option<i64>,
    pub last_error_message: Option<String>,
    pub last_synchronization_error_date: Option<i64>,
    pub max_connections: Option<i32>,
    pub allowed_updates: Option<Vec<String>>,
}

impl WebhookInfo {
    /// Whether the currently registered webhook already matches the
    /// desired target, so setup can skip a redundant `setWebhook` call.
    pub fn matches(&self, url: &str) -> bool {
        !self.url.is_empty() && self.url == url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> WebhookInfo {
        WebhookInfo {
            url: String::new(),
            has_custom_certificate: false,
            pending_update_count: 0,
            ip_address: None,
            last_error_date: None,
            last_error_message: None,
            last_synchronization_error_date: None,
            max_connections: None,
            allowed_updates: None,
        }
    }

    #[test]
    fn empty_url_never_matches() {
        assert!(!base().matches("https://example.com/hook"));
    }

    #[test]
    fn matching_url_reconciles_as_already_set() {
        let mut info = base();
        info.url = "https://example.com/hook".to_owned();
        assert!(info.matches("https://example.com/hook"));
    }
}
