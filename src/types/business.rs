//! Business-account update payloads: `business_connection`,
//! `business_message`/`edited_business_message`, `deleted_business_messages`.

use serde::{Deserialize, Serialize};

use super::{Chat, Message, User};

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct BusinessConnection {
    pub id: String,
    pub user: User,
    pub user_chat_id: i64,
    pub date: i64,
    pub can_reply: bool,
    pub is_enabled: bool,
}

/// Reuses [`Message`] for the business-message payload; the business
/// connection id travels alongside it rather than inside the message shape.
#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusinessMessage {
    pub business_connection_id: String,
    #[serde(flatten)]
    pub message: Message,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct BusinessMessagesDeleted {
    pub business_connection_id: String,
    pub chat: Chat,
    pub message_ids: Vec<i32>,
}
