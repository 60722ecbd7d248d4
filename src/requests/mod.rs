//! The transport-neutral call descriptor and the builder that accumulates
//! one.

pub mod file_arg;
pub mod media;

use std::collections::BTreeMap;

use serde::Serialize;

pub use file_arg::{FileArg, FileSource, Upload};
pub use media::{InputMedia, InputMediaKind, InputPaidMedia, InputPaidMediaKind, MediaFile};

/// One outbound Bot API call: a method name, its stringified arguments, and
/// any file parts it carries.
///
/// Cheap to clone for the urlencoded path; for the multipart path the body
/// is consumed once an encoder streams it, matching the "single-use for
/// streaming executions" invariant in §3.
#[derive(Clone, Debug)]
pub struct CallDescriptor {
    pub method: &'static str,
    pub args: BTreeMap<String, String>,
    pub files: BTreeMap<String, Upload>,
}

impl CallDescriptor {
    pub fn new(method: &'static str) -> Self {
        Self { method, args: BTreeMap::new(), files: BTreeMap::new() }
    }

    pub fn has(&self, name: &str) -> bool {
        self.args.contains_key(name) || self.files.contains_key(name)
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// The merged `{method, ...args}` JSON object used by the webhook's
    /// reply-in-response optimization (§4.5).
    pub fn to_reply_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert("method".to_owned(), serde_json::Value::String(self.method.to_owned()));
        for (k, v) in &self.args {
            obj.insert(k.clone(), serde_json::Value::String(v.clone()));
        }
        serde_json::Value::Object(obj)
    }
}

/// Accumulates typed parameters, files and nested media into a
/// [`CallDescriptor`]. See §4.1.
#[derive(Debug)]
pub struct RequestBuilder {
    descriptor: CallDescriptor,
    attach_counter: u64,
}

impl RequestBuilder {
    pub fn new(method: &'static str) -> Self {
        Self { descriptor: CallDescriptor::new(method), attach_counter: 0 }
    }

    pub fn has(&self, name: &str) -> bool {
        self.descriptor.has(name)
    }

    fn set_string(&mut self, name: &str, value: String) {
        self.descriptor.args.insert(name.to_owned(), value);
    }

    pub fn string(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_string(name, value.into());
        self
    }

    pub fn opt_string(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.string(name, v),
            None => self,
        }
    }

    pub fn bool(mut self, name: &str, value: bool) -> Self {
        self.set_string(name, value.to_string());
        self
    }

    pub fn int(mut self, name: &str, value: i64) -> Self {
        self.set_string(name, value.to_string());
        self
    }

    pub fn float(mut self, name: &str, value: f64) -> Self {
        self.set_string(name, value.to_string());
        self
    }

    pub fn stringer(mut self, name: &str, value: impl std::fmt::Display) -> Self {
        self.set_string(name, value.to_string());
        self
    }

    /// Marshals `value` to JSON and stores the result verbatim; used for
    /// any nested object argument (reply markup, entity lists, ...).
    pub fn json(mut self, name: &str, value: &impl Serialize) -> crate::Result<Self> {
        let encoded = serde_json::to_string(value)
            .map_err(|e| crate::Error::invalid_json(e, ""))?;
        self.set_string(name, encoded);
        Ok(self)
    }

    /// Registers a [`FileArg`] argument. An upload is stored as a file
    /// part; an id/url is stored as a plain string argument.
    pub fn file(mut self, name: &str, value: FileArg) -> Self {
        match value {
            FileArg::Upload(upload) => {
                self.descriptor.files.insert(name.to_owned(), upload);
            }
            other => {
                if let Some(s) = other.to_json_value().and_then(|v| v.as_str().map(str::to_owned)) {
                    self.set_string(name, s);
                }
            }
        }
        self
    }

    /// Registers a direct file part (e.g. `sticker`, `certificate`) that is
    /// never sent by reference.
    pub fn input_file(mut self, name: &str, upload: Upload) -> Self {
        self.descriptor.files.insert(name.to_owned(), upload);
        self
    }

    /// Applies the media-expansion pass of §4.1 to a single media object:
    /// assigns attach ids to any embedded uploads and registers them as
    /// file parts.
    fn expand_media(&mut self, media: &mut InputMedia) {
        Self::expand_one(&mut self.attach_counter, &mut self.descriptor.files, &mut media.file.media, None);
        if let Some(thumb) = &mut media.file.thumbnail {
            Self::expand_one(
                &mut self.attach_counter,
                &mut self.descriptor.files,
                thumb,
                Some("_thumb"),
            );
        }
        if let Some(cover) = &mut media.file.cover {
            Self::expand_one(
                &mut self.attach_counter,
                &mut self.descriptor.files,
                cover,
                Some("_cover"),
            );
        }
    }

    /// Same rewrite as [`Self::expand_media`], applied to a single
    /// [`InputPaidMedia`] item (no `cover` field to recurse into).
    fn expand_paid_media(&mut self, media: &mut InputPaidMedia) {
        Self::expand_one(&mut self.attach_counter, &mut self.descriptor.files, &mut media.file.media, None);
        if let Some(thumb) = &mut media.file.thumbnail {
            Self::expand_one(
                &mut self.attach_counter,
                &mut self.descriptor.files,
                thumb,
                Some("_thumb"),
            );
        }
    }

    fn expand_one(
        counter: &mut u64,
        files: &mut BTreeMap<String, Upload>,
        arg: &mut FileArg,
        suffix: Option<&str>,
    ) {
        let FileArg::Upload(upload) = arg else {
            // Already-by-reference media is left untouched.
            return;
        };
        if upload.attach_name.is_some() {
            return;
        }
        let base = format!("attachment_{counter}");
        *counter += 1;
        let id = match suffix {
            Some(suffix) => format!("{base}{suffix}"),
            None => base,
        };
        upload.attach_name = Some(id.clone());
        files.insert(id, upload.clone());
    }

    pub fn media(mut self, name: &str, mut value: InputMedia) -> crate::Result<Self> {
        self.expand_media(&mut value);
        let json = value.to_json_value()?;
        self.set_string(name, json.to_string());
        Ok(self)
    }

    pub fn media_group(mut self, name: &str, mut values: Vec<InputMedia>) -> crate::Result<Self> {
        let mut out = Vec::with_capacity(values.len());
        for media in &mut values {
            self.expand_media(media);
            out.push(media.to_json_value()?);
        }
        self.set_string(name, serde_json::Value::Array(out).to_string());
        Ok(self)
    }

    /// Registers `sendPaidMedia`'s media array, expanding each item's own
    /// upload (and thumbnail) into an `attach://` reference plus a file
    /// part, the same way [`Self::media_group`] does for `InputMedia`.
    pub fn paid_media(mut self, name: &str, mut values: Vec<InputPaidMedia>) -> crate::Result<Self> {
        let mut out = Vec::with_capacity(values.len());
        for media in &mut values {
            self.expand_paid_media(media);
            out.push(media.to_json_value()?);
        }
        self.set_string(name, serde_json::Value::Array(out).to_string());
        Ok(self)
    }

    pub fn build(self) -> CallDescriptor {
        self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_selection_uses_multipart_iff_files_present() {
        let urlencoded = RequestBuilder::new("sendMessage").string("chat_id", "1").build();
        assert!(!urlencoded.has_files());

        let multipart = RequestBuilder::new("sendDocument")
            .file("document", FileArg::upload(Upload::new("a.txt", b"hi".to_vec())))
            .build();
        assert!(multipart.has_files());
    }

    #[test]
    fn media_expansion_assigns_attach_ids_and_registers_file_parts() {
        let media = InputMedia::new(
            InputMediaKind::Photo,
            FileArg::upload(Upload::new("photo.png", vec![0u8; 4])),
        );
        let descriptor = RequestBuilder::new("sendPhoto").media("media", media).unwrap().build();
        assert_eq!(descriptor.files.len(), 1);
        let (id, _upload) = descriptor.files.iter().next().unwrap();
        assert!(id.starts_with("attachment_"));
        assert!(descriptor.args["media"].contains(&format!("attach://{id}")));
    }

    #[test]
    fn media_expansion_leaves_by_reference_media_untouched() {
        let media = InputMedia::new(InputMediaKind::Photo, FileArg::file_id("AAB1"));
        let descriptor = RequestBuilder::new("sendPhoto").media("media", media).unwrap().build();
        assert!(descriptor.files.is_empty());
        assert!(descriptor.args["media"].contains("AAB1"));
    }

    #[test]
    fn media_group_assigns_distinct_attach_ids() {
        let group = vec![
            InputMedia::new(InputMediaKind::Photo, FileArg::upload(Upload::new("a.png", vec![1]))),
            InputMedia::new(InputMediaKind::Photo, FileArg::upload(Upload::new("b.png", vec![2]))),
        ];
        let descriptor = RequestBuilder::new("sendMediaGroup").media_group("media", group).unwrap().build();
        assert_eq!(descriptor.files.len(), 2);
    }

    #[test]
    fn paid_media_expands_each_items_upload() {
        let items = vec![
            InputPaidMedia::new(InputPaidMediaKind::Photo, FileArg::upload(Upload::new("a.png", vec![1]))),
            InputPaidMedia::new(InputPaidMediaKind::Video, FileArg::upload(Upload::new("b.mp4", vec![2]))),
        ];
        let descriptor = RequestBuilder::new("sendPaidMedia").paid_media("media", items).unwrap().build();
        assert_eq!(descriptor.files.len(), 2);
        assert!(descriptor.args["media"].contains("\"type\":\"photo\""));
        assert!(descriptor.args["media"].contains("\"type\":\"video\""));
    }

    #[test]
    fn thumbnail_gets_a_suffixed_attach_id() {
        let media = InputMedia::new(
            InputMediaKind::Video,
            FileArg::upload(Upload::new("v.mp4", vec![1])),
        )
        .thumbnail(FileArg::upload(Upload::new("t.png", vec![2])));
        let descriptor = RequestBuilder::new("sendVideo").media("media", media).unwrap().build();
        assert_eq!(descriptor.files.len(), 2);
        assert!(descriptor.files.keys().any(|k| k.ends_with("_thumb")));
    }
}
