//! The long-polling update ingress of §4.4.

use std::{future::Future, time::Duration};

use crate::{client::Bot, requests::RequestBuilder, types::Update, Error, Result};

/// Configuration for [`Poller::run`]. Mirrors the Bot API's `getUpdates`
/// parameters plus a couple of dispatch-loop knobs.
#[derive(Clone, Debug)]
pub struct PollerConfig {
    /// Max updates per `getUpdates` batch.
    pub limit: u32,
    /// Long-poll timeout in seconds; `0` means the server chooses.
    pub timeout: u32,
    /// Restricts which update kinds the server delivers; `None` keeps the
    /// server's previously configured set (or all kinds, on first run).
    pub allowed_updates: Option<Vec<String>>,
    /// Caps how long a single handler invocation may run before the
    /// poller logs a warning and moves on to the next update.
    pub handler_timeout: Option<Duration>,
    /// The delay before retrying after a transient `get_updates` failure.
    pub retry_delay: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            timeout: 0,
            allowed_updates: None,
            handler_timeout: None,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Drives the long-polling state machine of §4.4: repeatedly calls
/// `getUpdates` with an advancing offset and hands each update to a
/// handler, strictly sequentially within a batch.
pub struct Poller {
    bot: Bot,
    config: PollerConfig,
}

impl Poller {
    pub fn new(bot: Bot, config: PollerConfig) -> Self {
        Self { bot, config }
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let mut builder = RequestBuilder::new("getUpdates")
            .int("offset", offset)
            .int("limit", self.config.limit as i64)
            .int("timeout", self.config.timeout as i64);
        if let Some(allowed) = &self.config.allowed_updates {
            builder = builder.json("allowed_updates", allowed)?;
        }
        self.bot.do_request(builder.build()).await
    }

    /// Runs the polling loop until `shutdown` resolves, handing each
    /// update to `handler` in arrival order. The offset only advances
    /// after a whole batch has been handed off (§3 invariant).
    pub async fn run<H, Fut>(&self, mut handler: H, mut shutdown: impl Future<Output = ()> + Unpin) -> Result<()>
    where
        H: FnMut(Update) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        use futures::future::{self, Either};

        let mut offset: i64 = 0;
        loop {
            let batch = match future::select(Box::pin(self.get_updates(offset)), &mut shutdown).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => {
                    log::info!("poller stopping: shutdown signal received");
                    return Err(Error::Cancelled);
                }
            };

            let updates = match batch {
                Ok(updates) => updates,
                Err(err) => {
                    if matches!(&err, Error::Api(api) if api.is_unauthorized()) {
                        log::error!("poller stopping: bot token rejected: {err}");
                        return Err(err);
                    }
                    log::warn!("get_updates failed, retrying in {:?}: {err}", self.config.retry_delay);
                    tokio::time::sleep(self.config.retry_delay).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id as i64 + 1);
                if let Err(err) = handler(update).await {
                    log::warn!("handler returned an error, continuing: {err}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = PollerConfig::default();
        assert_eq!(config.limit, 100);
        assert_eq!(config.timeout, 0);
        assert!(config.allowed_updates.is_none());
    }

    #[tokio::test]
    async fn run_surfaces_cancellation_instead_of_a_clean_ok() {
        let bot = Bot::builder("123:ABC").build().unwrap();
        let poller = Poller::new(bot, PollerConfig::default());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tx.send(()).unwrap();
        let shutdown = Box::pin(async move {
            rx.await.ok();
        });

        let err = poller.run(|_update| async { Ok(()) }, shutdown).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
