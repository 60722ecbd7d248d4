//! Retry-on-5xx interceptor: exponential backoff with jitter. See §4.3.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use super::{Clock, Middleware, Next, TokioClock};
use crate::{client::ResponseEnvelope, requests::CallDescriptor};

pub struct RetryOnServerError {
    tries: u32,
    base_delay: Duration,
    clock: Box<dyn Clock>,
}

impl RetryOnServerError {
    pub fn new() -> Self {
        Self { tries: 10, base_delay: Duration::from_millis(100), clock: Box::new(TokioClock) }
    }

    pub fn tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    pub fn base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// `delay * 2^i + uniform-jitter in [0, delay*2^i)`, per §4.3.
    fn backoff(&self, attempt: u32) -> Duration {
        let scaled = self.base_delay.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX));
        let jitter_upper_nanos = scaled.as_nanos().min(u64::MAX as u128) as u64;
        let jitter = if jitter_upper_nanos == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(rand::thread_rng().gen_range(0..jitter_upper_nanos))
        };
        scaled + jitter
    }
}

impl Default for RetryOnServerError {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Middleware for RetryOnServerError {
    async fn handle(&self, descriptor: CallDescriptor, next: Next) -> crate::Result<ResponseEnvelope> {
        let mut last_err = None;

        for attempt in 0..self.tries.max(1) {
            match next.clone().run(descriptor.clone()).await {
                Ok(envelope) => return Ok(envelope),
                Err(crate::Error::Api(api_err)) if api_err.is_server_error() => {
                    last_err = Some(crate::Error::Api(api_err));
                    if attempt + 1 < self.tries.max(1) {
                        let delay = self.backoff(attempt);
                        log::warn!("{} failed with 5xx, retrying in {:?}", descriptor.method, delay);
                        self.clock.sleep(delay).await;
                    }
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_err.expect("loop always runs at least once and only exits via return or this path"))
    }
}
