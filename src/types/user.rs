use serde::{Deserialize, Serialize};

/// A Telegram user or bot.
///
/// [The official docs](https://core.telegram.org/bots/api#user).
#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    pub is_bot: bool,

    pub first_name: String,

    pub last_name: Option<String>,

    pub username: Option<String>,

    pub language_code: Option<String>,

    #[serde(default)]
    pub is_premium: bool,

    #[serde(default)]
    pub added_to_attachment_menu: bool,
}

impl User {
    pub fn new(id: i64, is_bot: bool, first_name: impl Into<String>) -> Self {
        Self {
            id,
            is_bot,
            first_name: first_name.into(),
            last_name: None,
            username: None,
            language_code: None,
            is_premium: false,
            added_to_attachment_menu: false,
        }
    }

    /// The `@username` the command filter matches against, lowercased.
    pub fn mention(&self) -> Option<String> {
        self.username.as_ref().map(|u| u.to_lowercase())
    }

    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}
