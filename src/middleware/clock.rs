//! A small clock abstraction so retry middlewares can be driven by
//! `tokio::time` in production and by a paused/advanced clock in tests,
//! per the "a clock abstraction" parameter named in §4.3.

use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// The default clock: `tokio::time::sleep`. Under `#[tokio::test]` with
/// `tokio::time::pause()` active, this sleeps virtual time instantly and
/// can be driven forward with `tokio::time::advance`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
