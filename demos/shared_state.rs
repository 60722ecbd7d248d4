// This bot answers how many messages it received in total on every message.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use futures::FutureExt;
use once_cell::sync::Lazy;
use tbot_core::{prelude::*, requests::RequestBuilder};

static MESSAGES_TOTAL: Lazy<AtomicU64> = Lazy::new(AtomicU64::default);

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    log::info!("Starting shared state bot...");

    let bot = Bot::from_env()?;

    let router = {
        let bot = bot.clone();
        Router::builder()
            .on(UpdateKey::Message, |_u: &Update| true, move |update: Arc<Update>| {
                let bot = bot.clone();
                async move {
                    let Some(chat_id) = update.chat_id() else { return Ok(()) };
                    let previous = MESSAGES_TOTAL.fetch_add(1, Ordering::Relaxed);
                    let text = format!("I received {previous} messages in total.");
                    let descriptor =
                        RequestBuilder::new("sendMessage").int("chat_id", chat_id).string("text", text).build();
                    bot.do_request::<serde_json::Value>(descriptor).await?;
                    Ok(())
                }
            })
            .build()
    };

    let poller = Poller::new(bot, PollerConfig::default());
    let shutdown = Box::pin(tokio::signal::ctrl_c().map(|_| ()));
    match poller.run(|update| router.dispatch(update), shutdown).await {
        Ok(()) | Err(Error::Cancelled) => Ok(()),
        Err(err) => Err(err),
    }
}
