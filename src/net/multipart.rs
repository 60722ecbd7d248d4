//! The streaming `multipart/form-data` encoder.
//!
//! File parts are never buffered whole into memory when they originate
//! from disk: a [`reqwest::multipart::Part`] built from a file is backed by
//! a `ReaderStream`, so the bytes are read and written to the socket in
//! chunks as the HTTP body is drained, matching the "driven into a pipe
//! reader" description in §4.1 (the pipe itself is `reqwest`'s internal
//! body stream; we drive a file handle into it the same way).

use reqwest::multipart::{Form, Part};

use super::EncodedBody;
use crate::requests::{file_arg::FileSource, CallDescriptor, Upload};

pub struct MultipartEncoder;

impl MultipartEncoder {
    pub async fn encode(descriptor: CallDescriptor) -> crate::Result<EncodedBody> {
        let mut form = Form::new();

        for (name, value) in descriptor.args {
            form = form.text(name, value);
        }

        for (name, upload) in descriptor.files {
            let part = Self::part_for(upload).await?;
            form = form.part(name, part);
        }

        Ok(EncodedBody::Multipart(form))
    }

    async fn part_for(upload: Upload) -> crate::Result<Part> {
        let file_name = upload.file_name.clone();
        let part = match upload.source {
            FileSource::Memory(bytes) => Part::bytes(bytes.to_vec()),
            FileSource::Path(path) => {
                let file = tokio::fs::File::open(&*path).await?;
                let stream = tokio_util::io::ReaderStream::new(file);
                let body = reqwest::Body::wrap_stream(stream);
                Part::stream(body)
            }
        };
        Ok(part.file_name(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::{FileArg, RequestBuilder};

    #[tokio::test]
    async fn multipart_carries_the_file_part() {
        let descriptor = RequestBuilder::new("sendDocument")
            .string("chat_id", "1")
            .file("document", FileArg::upload(Upload::new("types.go", b"package tg".to_vec())))
            .build();
        let EncodedBody::Multipart(_form) = MultipartEncoder::encode(descriptor).await.unwrap() else {
            panic!("expected multipart body");
        };
    }
}
