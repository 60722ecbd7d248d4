//! Default-parse-mode interceptor. See §4.3.

use async_trait::async_trait;

use super::{Middleware, Next};
use crate::{client::ResponseEnvelope, requests::CallDescriptor, types::ParseMode};

/// If `parse_mode` is not already present on the request, stringifies the
/// configured parse mode into it.
pub struct DefaultParseMode {
    mode: ParseMode,
}

impl DefaultParseMode {
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }
}

#[async_trait]
impl Middleware for DefaultParseMode {
    async fn handle(&self, mut descriptor: CallDescriptor, next: Next) -> crate::Result<ResponseEnvelope> {
        if !descriptor.has("parse_mode") {
            descriptor.args.insert("parse_mode".to_owned(), self.mode.to_string());
        }
        next.run(descriptor).await
    }
}
