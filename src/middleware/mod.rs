//! The interceptor chain of §4.3: an ordered list of middlewares composed
//! around the raw invoke, first-registered outermost.

mod clock;
mod default_parse_mode;
mod method_filter;
mod retry_flood;
mod retry_server;

pub use clock::{Clock, TokioClock};
pub use default_parse_mode::DefaultParseMode;
pub use method_filter::MethodFilter;
pub use retry_flood::RetryOnFlood;
pub use retry_server::RetryOnServerError;

use std::{future::Future, pin::Pin, sync::Arc};

use async_trait::async_trait;

use crate::{client::ResponseEnvelope, requests::CallDescriptor};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A single link in the chain. `handle` receives the descriptor and a
/// [`Next`] representing everything inward of this middleware (the rest of
/// the chain, terminating in the raw HTTP execute+decode).
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, descriptor: CallDescriptor, next: Next) -> crate::Result<ResponseEnvelope>;
}

type RawInvoke = dyn Fn(CallDescriptor) -> BoxFuture<crate::Result<ResponseEnvelope>> + Send + Sync;

/// The remaining continuation of the chain at some point during dispatch.
/// Calling [`Next::run`] invokes the next middleware, or the raw invoker
/// once the chain is exhausted. Cheap to clone: everything it holds is
/// `Arc`-backed, mirroring the `Client`'s own cheap-clone discipline.
#[derive(Clone)]
pub struct Next {
    middlewares: Arc<[Arc<dyn Middleware>]>,
    index: usize,
    raw: Arc<RawInvoke>,
}

impl Next {
    pub fn run(self, descriptor: CallDescriptor) -> BoxFuture<crate::Result<ResponseEnvelope>> {
        match self.middlewares.get(self.index) {
            Some(mw) => {
                let mw = Arc::clone(mw);
                let next =
                    Next { middlewares: self.middlewares.clone(), index: self.index + 1, raw: self.raw.clone() };
                Box::pin(async move { mw.handle(descriptor, next).await })
            }
            None => (self.raw)(descriptor),
        }
    }
}

/// An ordered, immutable chain of middlewares. Built once at
/// [`crate::Client`] construction and shared behind an `Arc`.
pub struct Chain {
    middlewares: Arc<[Arc<dyn Middleware>]>,
}

impl Chain {
    pub fn new(middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self { middlewares: Arc::from(middlewares) }
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Runs the chain around `raw`, which performs the actual HTTP
    /// round-trip and envelope decode (§4.2). `raw` must not borrow
    /// anything shorter-lived than `'static`; callers reach their client
    /// state through an owned `Arc` clone, the same way `Next` does.
    pub async fn call<F, Fut>(&self, descriptor: CallDescriptor, raw: F) -> crate::Result<ResponseEnvelope>
    where
        F: Fn(CallDescriptor) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<ResponseEnvelope>> + Send + 'static,
    {
        let raw: Arc<RawInvoke> = Arc::new(move |d| Box::pin(raw(d)) as BoxFuture<_>);
        let next = Next { middlewares: self.middlewares.clone(), index: 0, raw };
        next.run(descriptor).await
    }
}
