//! Method-whitelist interceptor. See §4.3.

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;

use super::{Middleware, Next};
use crate::{client::ResponseEnvelope, requests::CallDescriptor};

/// Delegates to the wrapped middleware only when the request's method is in
/// `methods`; otherwise bypasses straight to `next`.
pub struct MethodFilter {
    methods: HashSet<&'static str>,
    inner: Arc<dyn Middleware>,
}

impl MethodFilter {
    pub fn new(methods: impl IntoIterator<Item = &'static str>, inner: Arc<dyn Middleware>) -> Self {
        Self { methods: methods.into_iter().collect(), inner }
    }
}

#[async_trait]
impl Middleware for MethodFilter {
    async fn handle(&self, descriptor: CallDescriptor, next: Next) -> crate::Result<ResponseEnvelope> {
        if self.methods.contains(descriptor.method) {
            self.inner.handle(descriptor, next).await
        } else {
            next.run(descriptor).await
        }
    }
}
