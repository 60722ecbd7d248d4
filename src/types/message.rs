//! The `Message` type and the message-subtype classifier of §4.6.

use serde::{Deserialize, Serialize};

use super::{
    media::{
        Animation, Audio, Contact, Dice, Document, Game, Location, PhotoSize, ServiceFields, Sticker, Venue,
        Video, VideoChatEnded, VideoChatParticipantsInvited, VideoChatScheduled, VideoChatStarted, VideoNote,
        Voice, WebAppData,
    },
    payment::{Invoice, SuccessfulPayment},
    passport::PassportData,
    Chat, MessageEntity, User,
};

/// The classified shape of a [`Message`], resolved by [`Message::kind`]
/// following the fixed priority order of §4.6. This is a *read model*: the
/// wire format is a flat set of optional fields (matching the Bot API's
/// own JSON shape), not a tagged union; `kind` is how callers get the
/// tagged view back.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageKind {
    Text,
    Animation,
    Audio,
    Document,
    Photo,
    Sticker,
    Video,
    VideoNote,
    Voice,
    Contact,
    Dice,
    Game,
    Poll,
    Venue,
    Location,
    Service,
    Invoice,
    SuccessfulPayment,
    PassportData,
    VideoChatScheduled,
    VideoChatStarted,
    VideoChatEnded,
    VideoChatParticipantsInvited,
    WebAppData,
    /// None of the known content fields were populated; a strict
    /// classifier (§9, open question) never falls back to treating
    /// metadata-only fields like `from` as content.
    Unknown,
}

/// A Telegram message. Every content-bearing field below is mutually
/// exclusive in practice (§3 invariant), but modeled as independent
/// `Option`s because that's the shape the Bot API actually sends.
///
/// [The official docs](https://core.telegram.org/bots/api#message).
#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "message_id")]
    pub id: i32,

    pub message_thread_id: Option<i32>,

    /// Unix timestamp. `0` only ever appears on the inaccessible-message
    /// shape carried by a callback query (§3), never on a real `Message`.
    pub date: i64,

    pub chat: Chat,

    pub from: Option<User>,

    pub sender_chat: Option<Chat>,

    pub via_bot: Option<User>,

    pub edit_date: Option<i64>,

    pub media_group_id: Option<String>,

    pub author_signature: Option<String>,

    pub reply_to_message: Option<Box<Message>>,

    // --- content fields, in §4.6 priority order ---
    pub text: Option<String>,
    pub entities: Option<Vec<MessageEntity>>,

    pub animation: Option<Animation>,
    pub audio: Option<Audio>,
    pub document: Option<Document>,
    pub photo: Option<Vec<PhotoSize>>,
    pub sticker: Option<Sticker>,
    pub video: Option<Video>,
    pub video_note: Option<VideoNote>,
    pub voice: Option<Voice>,
    pub caption: Option<String>,
    pub caption_entities: Option<Vec<MessageEntity>>,

    pub contact: Option<Contact>,
    pub dice: Option<Dice>,
    pub game: Option<Game>,
    pub poll: Option<super::Poll>,
    pub venue: Option<Venue>,
    pub location: Option<Location>,

    #[serde(flatten)]
    pub service: ServiceFields,

    pub invoice: Option<Invoice>,
    pub successful_payment: Option<SuccessfulPayment>,
    pub passport_data: Option<PassportData>,

    pub video_chat_scheduled: Option<VideoChatScheduled>,
    pub video_chat_started: Option<VideoChatStarted>,
    pub video_chat_ended: Option<VideoChatEnded>,
    pub video_chat_participants_invited: Option<VideoChatParticipantsInvited>,

    pub web_app_data: Option<WebAppData>,
}

impl Message {
    /// Classifies this message's content shape per the fixed priority
    /// order of §4.6.
    pub fn kind(&self) -> MessageKind {
        if self.text.is_some() {
            MessageKind::Text
        } else if self.animation.is_some() {
            MessageKind::Animation
        } else if self.audio.is_some() {
            MessageKind::Audio
        } else if self.document.is_some() {
            MessageKind::Document
        } else if self.photo.is_some() {
            MessageKind::Photo
        } else if self.sticker.is_some() {
            MessageKind::Sticker
        } else if self.video.is_some() {
            MessageKind::Video
        } else if self.video_note.is_some() {
            MessageKind::VideoNote
        } else if self.voice.is_some() {
            MessageKind::Voice
        } else if self.contact.is_some() {
            MessageKind::Contact
        } else if self.dice.is_some() {
            MessageKind::Dice
        } else if self.game.is_some() {
            MessageKind::Game
        } else if self.poll.is_some() {
            MessageKind::Poll
        } else if self.venue.is_some() {
            MessageKind::Venue
        } else if self.location.is_some() {
            MessageKind::Location
        } else if !self.service.is_empty() {
            MessageKind::Service
        } else if self.invoice.is_some() {
            MessageKind::Invoice
        } else if self.successful_payment.is_some() {
            MessageKind::SuccessfulPayment
        } else if self.passport_data.is_some() {
            MessageKind::PassportData
        } else if self.video_chat_scheduled.is_some() {
            MessageKind::VideoChatScheduled
        } else if self.video_chat_started.is_some() {
            MessageKind::VideoChatStarted
        } else if self.video_chat_ended.is_some() {
            MessageKind::VideoChatEnded
        } else if self.video_chat_participants_invited.is_some() {
            MessageKind::VideoChatParticipantsInvited
        } else if self.web_app_data.is_some() {
            MessageKind::WebAppData
        } else {
            MessageKind::Unknown
        }
    }

    /// The text or caption applicable to filters like `Regexp` — whichever
    /// of the two this message's kind actually carries.
    pub fn text_or_caption(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }

    pub fn is_inaccessible(&self) -> bool {
        self.date == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatType;

    fn base(chat_id: i64) -> Message {
        serde_json::from_value(serde_json::json!({
            "message_id": 1,
            "date": 1700000000,
            "chat": {"id": chat_id, "type": "private"},
        }))
        .unwrap()
    }

    #[test]
    fn classifies_text_message() {
        let mut msg = base(1);
        msg.text = Some("hello".to_owned());
        assert_eq!(msg.kind(), MessageKind::Text);
    }

    #[test]
    fn from_alone_does_not_classify_as_text_strict_classifier() {
        let mut msg = base(1);
        msg.from = Some(User::new(7, false, "Ann"));
        assert_eq!(msg.kind(), MessageKind::Unknown);
    }

    #[test]
    fn text_takes_priority_over_animation() {
        let mut msg = base(1);
        msg.text = Some("caption text".to_owned());
        msg.animation = Some(Animation {
            file_id: "f".into(),
            file_unique_id: "u".into(),
            width: 1,
            height: 1,
            duration: 1,
            thumbnail: None,
            file_name: None,
            mime_type: None,
            file_size: None,
        });
        assert_eq!(msg.kind(), MessageKind::Text);
    }

    #[test]
    fn service_event_classifies_when_no_content_field_set() {
        let mut msg = base(1);
        msg.service.new_chat_title = Some("New title".to_owned());
        assert_eq!(msg.kind(), MessageKind::Service);
    }

    #[test]
    fn inaccessible_predicate_uses_zero_date() {
        let json = serde_json::json!({"message_id": 5, "date": 0, "chat": {"id": 1, "type": "private"}});
        let msg: Message = serde_json::from_value(json).unwrap();
        assert!(msg.is_inaccessible());
        assert_eq!(msg.chat.kind, ChatType::Private);
    }
}
