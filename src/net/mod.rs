//! The two wire encoders: `application/x-www-form-urlencoded` and streaming
//! `multipart/form-data`. See §4.1.

mod multipart;
mod urlencoded;

pub use multipart::MultipartEncoder;
pub use urlencoded::UrlencodedEncoder;

use crate::requests::CallDescriptor;

/// What a call descriptor encoded down to. `reqwest` knows how to attach
/// either variant to a request and set the right `Content-Type` itself, so
/// this is what the [`crate::Client`] consumes rather than a raw body.
pub enum EncodedBody {
    Urlencoded(Vec<(String, String)>),
    Multipart(reqwest::multipart::Form),
}

impl EncodedBody {
    /// The `Content-Type` this body will be sent with; used by interceptors
    /// and tests that want to assert on encoding selection without
    /// inspecting a live request.
    pub fn content_type_prefix(&self) -> &'static str {
        match self {
            Self::Urlencoded(_) => UrlencodedEncoder::CONTENT_TYPE,
            Self::Multipart(_) => "multipart/form-data",
        }
    }
}

/// Picks and runs the right encoder for `descriptor`, per the "Encoding
/// selection" rule of §4.1: multipart iff at least one file part is
/// present, urlencoded otherwise.
pub async fn encode(descriptor: CallDescriptor) -> crate::Result<EncodedBody> {
    if descriptor.has_files() {
        MultipartEncoder::encode(descriptor).await
    } else {
        UrlencodedEncoder::encode(descriptor)
    }
}
