// A bot that echoes every message it receives back to the same chat,
// served over a webhook instead of long-polling.

use std::sync::Arc;

use futures::FutureExt;
use tbot_core::{dispatching::webhook, prelude::*, requests::RequestBuilder};

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    log::info!("Starting webhook echo bot...");

    let bot = Bot::from_env()?;

    let router = Router::builder()
        .on(UpdateKey::Message, |_u: &Update| true, |update: Arc<Update>| async move {
            let (Some(chat_id), Some(text)) = (update.chat_id(), update.msg().and_then(|m| m.text_or_caption()))
            else {
                return Ok(());
            };
            let descriptor =
                RequestBuilder::new("sendMessage").int("chat_id", chat_id).string("text", text).build();
            webhook::reply_in_response(&descriptor);
            Ok(())
        })
        .build();

    let config = WebhookConfig::new("https://example.com/telegram-webhook", "0.0.0.0:8443".parse().unwrap());
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    webhook::serve(bot, router, config, shutdown).await
}
