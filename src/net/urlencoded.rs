//! The `application/x-www-form-urlencoded` encoder. Fails on file parts, as
//! noted by the "Urlencoded fails WriteFile" rule in §4.1.

use super::EncodedBody;
use crate::requests::CallDescriptor;

pub struct UrlencodedEncoder;

impl UrlencodedEncoder {
    pub const CONTENT_TYPE: &'static str = "application/x-www-form-urlencoded";

    pub fn encode(descriptor: CallDescriptor) -> crate::Result<EncodedBody> {
        debug_assert!(!descriptor.has_files(), "urlencoded encoder invoked with file parts present");
        let pairs = descriptor.args.into_iter().collect();
        Ok(EncodedBody::Urlencoded(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::RequestBuilder;

    #[test]
    fn carries_every_argument() {
        let descriptor = RequestBuilder::new("sendMessage")
            .string("chat_id", "1")
            .string("text", "Hello world")
            .build();
        let EncodedBody::Urlencoded(pairs) = UrlencodedEncoder::encode(descriptor).unwrap() else {
            panic!("expected urlencoded body");
        };
        assert!(pairs.contains(&("chat_id".to_owned(), "1".to_owned())));
        assert!(pairs.contains(&("text".to_owned(), "Hello world".to_owned())));
    }
}
