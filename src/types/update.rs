//! The `Update` tagged union (§3) and its classification/extractor
//! helpers (§4.6).

use serde::{Deserialize, Serialize};

use super::{
    boost::{ChatBoostRemoved, ChatBoostUpdated},
    business::{BusinessConnection, BusinessMessage, BusinessMessagesDeleted},
    callback_query::CallbackQuery,
    chat_member::{ChatJoinRequest, ChatMemberUpdated},
    inline::{ChosenInlineResult, InlineQuery},
    payment::{PreCheckoutQuery, ShippingQuery},
    reaction::{MessageReactionCountUpdated, MessageReactionUpdated},
    Chat, Message, Poll, PollAnswer, User,
};

/// A single variant of an [`Update`], discriminated by which field the
/// Bot API populated. The wire shape is flat optional fields on `Update`
/// (like [`Message`]'s content fields); this is the read model handed
/// back by [`Update::kind`].
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateKind {
    Message(Message),
    EditedMessage(Message),
    ChannelPost(Message),
    EditedChannelPost(Message),
    InlineQuery(InlineQuery),
    ChosenInlineResult(ChosenInlineResult),
    CallbackQuery(CallbackQuery),
    ShippingQuery(ShippingQuery),
    PreCheckoutQuery(PreCheckoutQuery),
    Poll(Poll),
    PollAnswer(PollAnswer),
    MyChatMember(ChatMemberUpdated),
    ChatMember(ChatMemberUpdated),
    ChatJoinRequest(ChatJoinRequest),
    MessageReaction(MessageReactionUpdated),
    MessageReactionCount(MessageReactionCountUpdated),
    ChatBoost(ChatBoostUpdated),
    RemovedChatBoost(ChatBoostRemoved),
    BusinessConnection(BusinessConnection),
    BusinessMessage(BusinessMessage),
    EditedBusinessMessage(BusinessMessage),
    DeletedBusinessMessages(BusinessMessagesDeleted),
    /// None of the ~22 known variant fields were populated.
    Unknown,
}

/// An incoming update from `getUpdates` or a webhook delivery.
///
/// At most one variant field is populated per the server contract (§3),
/// but every field is modeled as an independent `Option` since that's the
/// wire shape Telegram actually sends.
///
/// [The official docs](https://core.telegram.org/bots/api#update).
#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i32,

    pub message: Option<Message>,
    pub edited_message: Option<Message>,
    pub channel_post: Option<Message>,
    pub edited_channel_post: Option<Message>,
    pub inline_query: Option<InlineQuery>,
    pub chosen_inline_result: Option<ChosenInlineResult>,
    pub callback_query: Option<CallbackQuery>,
    pub shipping_query: Option<ShippingQuery>,
    pub pre_checkout_query: Option<PreCheckoutQuery>,
    pub poll: Option<Poll>,
    pub poll_answer: Option<PollAnswer>,
    pub my_chat_member: Option<ChatMemberUpdated>,
    pub chat_member: Option<ChatMemberUpdated>,
    pub chat_join_request: Option<ChatJoinRequest>,
    pub message_reaction: Option<MessageReactionUpdated>,
    pub message_reaction_count: Option<MessageReactionCountUpdated>,
    pub chat_boost: Option<ChatBoostUpdated>,
    pub removed_chat_boost: Option<ChatBoostRemoved>,
    pub business_connection: Option<BusinessConnection>,
    pub business_message: Option<BusinessMessage>,
    pub edited_business_message: Option<BusinessMessage>,
    pub deleted_business_messages: Option<BusinessMessagesDeleted>,
}

impl Update {
    /// Classifies this update by the fixed priority order of §3/§4.6.
    pub fn kind(&self) -> UpdateKind {
        if let Some(m) = &self.message {
            UpdateKind::Message(m.clone())
        } else if let Some(m) = &self.edited_message {
            UpdateKind::EditedMessage(m.clone())
        } else if let Some(m) = &self.channel_post {
            UpdateKind::ChannelPost(m.clone())
        } else if let Some(m) = &self.edited_channel_post {
            UpdateKind::EditedChannelPost(m.clone())
        } else if let Some(q) = &self.inline_query {
            UpdateKind::InlineQuery(q.clone())
        } else if let Some(r) = &self.chosen_inline_result {
            UpdateKind::ChosenInlineResult(r.clone())
        } else if let Some(q) = &self.callback_query {
            UpdateKind::CallbackQuery(q.clone())
        } else if let Some(q) = &self.shipping_query {
            UpdateKind::ShippingQuery(q.clone())
        } else if let Some(q) = &self.pre_checkout_query {
            UpdateKind::PreCheckoutQuery(q.clone())
        } else if let Some(p) = &self.poll {
            UpdateKind::Poll(p.clone())
        } else if let Some(a) = &self.poll_answer {
            UpdateKind::PollAnswer(a.clone())
        } else if let Some(m) = &self.my_chat_member {
            UpdateKind::MyChatMember(m.clone())
        } else if let Some(m) = &self.chat_member {
            UpdateKind::ChatMember(m.clone())
        } else if let Some(r) = &self.chat_join_request {
            UpdateKind::ChatJoinRequest(r.clone())
        } else if let Some(r) = &self.message_reaction {
            UpdateKind::MessageReaction(r.clone())
        } else if let Some(r) = &self.message_reaction_count {
            UpdateKind::MessageReactionCount(r.clone())
        } else if let Some(b) = &self.chat_boost {
            UpdateKind::ChatBoost(b.clone())
        } else if let Some(b) = &self.removed_chat_boost {
            UpdateKind::RemovedChatBoost(b.clone())
        } else if let Some(c) = &self.business_connection {
            UpdateKind::BusinessConnection(c.clone())
        } else if let Some(m) = &self.business_message {
            UpdateKind::BusinessMessage(m.clone())
        } else if let Some(m) = &self.edited_business_message {
            UpdateKind::EditedBusinessMessage(m.clone())
        } else if let Some(d) = &self.deleted_business_messages {
            UpdateKind::DeletedBusinessMessages(d.clone())
        } else {
            UpdateKind::Unknown
        }
    }

    /// The message carried by this update, if any — across all message-
    /// bearing variants (plain and business), in the same priority order
    /// as [`Update::kind`].
    pub fn msg(&self) -> Option<&Message> {
        self.message
            .as_ref()
            .or(self.edited_message.as_ref())
            .or(self.channel_post.as_ref())
            .or(self.edited_channel_post.as_ref())
            .or(self.callback_query.as_ref().and_then(|q| q.message.as_ref()).and_then(|m| m.as_message()))
            .or(self.business_message.as_ref().map(|m| &m.message))
            .or(self.edited_business_message.as_ref().map(|m| &m.message))
    }

    /// The chat this update is about, if any.
    pub fn chat(&self) -> Option<&Chat> {
        self.msg()
            .map(|m| &m.chat)
            .or_else(|| self.my_chat_member.as_ref().map(|u| &u.chat))
            .or_else(|| self.chat_member.as_ref().map(|u| &u.chat))
            .or_else(|| self.chat_join_request.as_ref().map(|r| &r.chat))
            .or_else(|| self.message_reaction.as_ref().map(|r| &r.chat))
            .or_else(|| self.message_reaction_count.as_ref().map(|r| &r.chat))
            .or_else(|| self.chat_boost.as_ref().map(|b| &b.chat))
            .or_else(|| self.removed_chat_boost.as_ref().map(|b| &b.chat))
            .or_else(|| self.deleted_business_messages.as_ref().map(|d| &d.chat))
            .or_else(|| self.callback_query.as_ref().and_then(|q| q.message.as_ref()).map(|m| m.chat()))
    }

    /// The user who triggered this update, if any.
    pub fn user(&self) -> Option<&User> {
        self.msg()
            .and_then(|m| m.from.as_ref())
            .or_else(|| self.edited_message.as_ref().and_then(|m| m.from.as_ref()))
            .or_else(|| self.inline_query.as_ref().map(|q| &q.from))
            .or_else(|| self.chosen_inline_result.as_ref().map(|r| &r.from))
            .or_else(|| self.callback_query.as_ref().map(|q| &q.from))
            .or_else(|| self.shipping_query.as_ref().map(|q| &q.from))
            .or_else(|| self.pre_checkout_query.as_ref().map(|q| &q.from))
            .or_else(|| self.poll_answer.as_ref().and_then(|a| a.user.as_ref()))
            .or_else(|| self.my_chat_member.as_ref().map(|u| &u.from))
            .or_else(|| self.chat_member.as_ref().map(|u| &u.from))
            .or_else(|| self.chat_join_request.as_ref().map(|r| &r.from))
            .or_else(|| self.message_reaction.as_ref().and_then(|r| r.user.as_ref()))
    }

    /// The sender chat of this update's message, if any (distinct from the
    /// user — set for channel posts and anonymous-admin sends).
    pub fn sender_chat(&self) -> Option<&Chat> {
        self.msg().and_then(|m| m.sender_chat.as_ref())
    }

    /// The message id this update is about, if any.
    pub fn msg_id(&self) -> Option<i32> {
        self.msg()
            .map(|m| m.id)
            .or_else(|| self.callback_query.as_ref().and_then(|q| q.message.as_ref()).map(|m| m.message_id()))
            .or_else(|| self.message_reaction.as_ref().map(|r| r.message_id))
            .or_else(|| self.message_reaction_count.as_ref().map(|r| r.message_id))
    }

    /// The chat id this update is about, if any.
    pub fn chat_id(&self) -> Option<i64> {
        self.chat().map(|c| c.id)
    }

    /// The inline message id this update is about, present only for
    /// updates originating from an inline-mode message.
    pub fn inline_message_id(&self) -> Option<&str> {
        self.callback_query.as_ref().and_then(|q| q.inline_message_id.as_deref())
    }

    /// The business connection id this update travels under, if any.
    pub fn business_connection_id(&self) -> Option<&str> {
        self.business_connection
            .as_ref()
            .map(|c| c.id.as_str())
            .or_else(|| self.business_message.as_ref().map(|m| m.business_connection_id.as_str()))
            .or_else(|| self.edited_business_message.as_ref().map(|m| m.business_connection_id.as_str()))
            .or_else(|| self.deleted_business_messages.as_ref().map(|d| d.business_connection_id.as_str()))
    }
}
