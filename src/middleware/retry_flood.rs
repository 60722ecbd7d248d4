//! Retry-on-flood (HTTP 429) interceptor. See §4.3 and scenarios 3–4 of §8.

use std::time::Duration;

use async_trait::async_trait;

use super::{Clock, Middleware, Next, TokioClock};
use crate::{client::ResponseEnvelope, requests::CallDescriptor};

/// Retries a call when the remote answers with a `429` carrying
/// `parameters.retry_after`, as long as that delay doesn't exceed
/// `max_retry_after`.
pub struct RetryOnFlood {
    tries: u32,
    max_retry_after: Duration,
    clock: Box<dyn Clock>,
}

impl RetryOnFlood {
    pub fn new() -> Self {
        Self { tries: 3, max_retry_after: Duration::from_secs(60 * 60), clock: Box::new(TokioClock) }
    }

    pub fn tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    pub fn max_retry_after(mut self, max_retry_after: Duration) -> Self {
        self.max_retry_after = max_retry_after;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }
}

impl Default for RetryOnFlood {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Middleware for RetryOnFlood {
    async fn handle(&self, descriptor: CallDescriptor, next: Next) -> crate::Result<ResponseEnvelope> {
        let mut last_err = None;

        for _attempt in 0..self.tries.max(1) {
            match next.clone().run(descriptor.clone()).await {
                Ok(envelope) => return Ok(envelope),
                Err(crate::Error::Api(api_err)) if api_err.is_flood() => {
                    let retry_after = api_err.retry_after();
                    match retry_after {
                        Some(delay) if delay <= self.max_retry_after => {
                            log::warn!(
                                "flood control: {} retrying after {:?}",
                                descriptor.method,
                                delay
                            );
                            self.clock.sleep(delay).await;
                            last_err = Some(crate::Error::Api(api_err));
                            continue;
                        }
                        _ => return Err(crate::Error::Api(api_err)),
                    }
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_err.expect("loop always runs at least once and only exits via return or this path"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use super::*;
    use crate::{
        error::{ApiError, ResponseParameters},
        middleware::Chain,
    };

    fn flood_envelope_err(retry_after: u64) -> crate::Error {
        crate::Error::Api(
            ApiError::new(429, "Too Many Requests: retry later")
                .with_parameters(ResponseParameters { retry_after: Some(retry_after), ..Default::default() }),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn retries_once_when_retry_after_equals_ceiling() {
        let calls = Arc::new(AtomicU32::new(0));
        let chain = Chain::new(vec![Arc::new(
            RetryOnFlood::new().tries(3).max_retry_after(Duration::from_secs(2)),
        )]);

        let calls_inner = calls.clone();
        let descriptor = CallDescriptor::new("sendMessage");
        let result = chain
            .call(descriptor, move |_d| {
                let calls = calls_inner.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n == 0 {
                        Err(flood_envelope_err(2))
                    } else {
                        Ok(ResponseEnvelope {
                            ok: true,
                            result: Some(serde_json::json!(true)),
                            description: None,
                            error_code: None,
                            parameters: None,
                            http_status: 200,
                        })
                    }
                }
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_when_retry_after_exceeds_ceiling() {
        let calls = Arc::new(AtomicU32::new(0));
        let chain = Chain::new(vec![Arc::new(
            RetryOnFlood::new().tries(3).max_retry_after(Duration::from_secs(2)),
        )]);

        let calls_inner = calls.clone();
        let descriptor = CallDescriptor::new("sendMessage");
        let result = chain
            .call(descriptor, move |_d| {
                let calls = calls_inner.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(flood_envelope_err(5))
                }
            })
            .await;

        let err = result.unwrap_err();
        let api_err = err.api_error().unwrap();
        assert_eq!(api_err.code, 429);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_flood_errors_return_immediately() {
        let chain = Chain::new(vec![Arc::new(RetryOnFlood::new())]);
        let descriptor = CallDescriptor::new("sendMessage");
        let result = chain
            .call(descriptor, |_d| async move {
                Err(crate::Error::Api(crate::error::ApiError::new(400, "Bad Request")))
            })
            .await;
        assert_eq!(result.unwrap_err().api_error().unwrap().code, 400);
    }
}
