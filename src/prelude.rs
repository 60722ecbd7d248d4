//! Commonly used items.

pub use crate::{
    dispatching::{
        filters::{All, Any, ChatTypeFilter, Command, Filter, MessageTypeFilter, Not, Regexp},
        Poller, PollerConfig, Router, UpdateKey,
    },
    requests::RequestBuilder,
    types::{Chat, Message, Update, User},
    Bot, ClientBuilder, Error, Result,
};

#[cfg(feature = "webhook")]
pub use crate::dispatching::{reply_in_response, SecretTokenConfig, WebhookConfig};
