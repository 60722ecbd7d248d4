//! `CallbackQuery` and the maybe-inaccessible message it may reference
//! (§3).

use serde::{Deserialize, Deserializer, Serialize};

use super::{Chat, Message, User};

/// The minimal shape Telegram sends when the message a callback query
/// refers to is too old to be edited: just enough to identify it.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct InaccessibleMessage {
    pub chat: Chat,
    pub message_id: i32,
    /// Always `0`; kept as a field (rather than implied) so the type
    /// round-trips byte-for-byte.
    pub date: i64,
}

/// Either a full [`Message`] or an [`InaccessibleMessage`], discriminated
/// by `date == 0` at deserialization time, per §3.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MaybeInaccessibleMessage {
    Message(Box<Message>),
    Inaccessible(InaccessibleMessage),
}

impl MaybeInaccessibleMessage {
    pub fn chat(&self) -> &Chat {
        match self {
            Self::Message(msg) => &msg.chat,
            Self::Inaccessible(msg) => &msg.chat,
        }
    }

    pub fn message_id(&self) -> i32 {
        match self {
            Self::Message(msg) => msg.id,
            Self::Inaccessible(msg) => msg.message_id,
        }
    }

    pub fn is_accessible(&self) -> bool {
        matches!(self, Self::Message(_))
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::Message(msg) => Some(msg),
            Self::Inaccessible(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for MaybeInaccessibleMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let date = value.get("date").and_then(serde_json::Value::as_i64).unwrap_or(0);
        if date == 0 {
            serde_json::from_value(value).map(Self::Inaccessible).map_err(serde::de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(|msg| Self::Message(Box::new(msg)))
                .map_err(serde::de::Error::custom)
        }
    }
}

/// An incoming callback query from an inline keyboard button press.
///
/// [The official docs](https://core.telegram.org/bots/api#callbackquery).
#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<MaybeInaccessibleMessage>,
    pub inline_message_id: Option<String>,
    pub chat_instance: String,
    pub data: Option<String>,
    pub game_short_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_date_message_deserializes_as_inaccessible() {
        let value = serde_json::json!({"chat": {"id": 9, "type": "private"}, "message_id": 3, "date": 0});
        let msg: MaybeInaccessibleMessage = serde_json::from_value(value).unwrap();
        assert!(!msg.is_accessible());
        assert_eq!(msg.message_id(), 3);
    }

    #[test]
    fn nonzero_date_message_deserializes_as_full_message() {
        let value = serde_json::json!({
            "message_id": 3, "date": 1700000000, "chat": {"id": 9, "type": "private"}, "text": "hi"
        });
        let msg: MaybeInaccessibleMessage = serde_json::from_value(value).unwrap();
        assert!(msg.is_accessible());
        assert_eq!(msg.as_message().unwrap().text.as_deref(), Some("hi"));
    }
}
