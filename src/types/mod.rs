//! The Bot API data model (§3): wire types shared by requests and
//! updates, plus the classification helpers of §4.6.

mod boost;
mod business;
mod callback_query;
mod chat;
mod chat_member;
mod file;
mod inline;
mod media;
mod message;
mod message_entity;
mod parse_mode;
mod passport;
mod payment;
mod poll;
mod reaction;
mod update;
mod user;
mod webhook_info;

pub use boost::{ChatBoost, ChatBoostRemoved, ChatBoostSource, ChatBoostUpdated};
pub use business::{BusinessConnection, BusinessMessage, BusinessMessagesDeleted};
pub use callback_query::{CallbackQuery, InaccessibleMessage, MaybeInaccessibleMessage};
pub use chat::{Chat, ChatType};
pub use chat_member::{ChatInviteLink, ChatJoinRequest, ChatMember, ChatMemberStatus, ChatMemberUpdated};
pub use file::File;
pub use inline::{ChosenInlineResult, InlineQuery};
pub use media::{
    Animation, Audio, Contact, Dice, Document, Game, Location, PhotoSize, ServiceFields, Sticker, Venue, Video,
    VideoChatEnded, VideoChatParticipantsInvited, VideoChatScheduled, VideoChatStarted, VideoNote, Voice,
    WebAppData,
};
pub use message::{Message, MessageKind};
pub use message_entity::{MessageEntity, MessageEntityKind};
pub use parse_mode::ParseMode;
pub use passport::{EncryptedCredentials, EncryptedPassportElement, PassportData};
pub use payment::{Invoice, OrderInfo, PreCheckoutQuery, ShippingAddress, ShippingQuery, SuccessfulPayment};
pub use poll::{Poll, PollAnswer, PollOption, PollType};
pub use reaction::{MessageReactionCountUpdated, MessageReactionUpdated, ReactionCount, ReactionType};
pub use update::{Update, UpdateKind};
pub use user::User;
pub use webhook_info::WebhookInfo;
