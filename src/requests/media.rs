//! Media unions (`InputMedia*`) and the `attach://` rewrite described in
//! §4.1 and the design notes of the media-with-embedded-uploads concern.

use serde::Serialize;

use super::file_arg::FileArg;

/// One attachable media object: its own file, plus an optional thumbnail
/// and/or cover, each independently possibly a fresh upload.
#[derive(Clone, Debug)]
pub struct MediaFile {
    pub media: FileArg,
    pub thumbnail: Option<FileArg>,
    pub cover: Option<FileArg>,
}

impl MediaFile {
    pub fn new(media: FileArg) -> Self {
        Self { media, thumbnail: None, cover: None }
    }

    pub fn thumbnail(mut self, thumb: FileArg) -> Self {
        self.thumbnail = Some(thumb);
        self
    }

    pub fn cover(mut self, cover: FileArg) -> Self {
        self.cover = Some(cover);
        self
    }
}

/// The kind-specific payload of an `InputMedia*` variant, beyond the shared
/// `media`/`thumbnail`/caption fields every variant carries.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MediaCaption {
    pub caption: Option<String>,
    pub parse_mode: Option<String>,
}

/// A single media object to attach to a call (`sendPhoto`, one element of a
/// media group, ...).
#[derive(Clone, Debug)]
pub struct InputMedia {
    pub kind: InputMediaKind,
    pub file: MediaFile,
    pub caption: MediaCaption,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMediaKind {
    Photo,
    Video,
    Animation,
    Audio,
    Document,
}

impl InputMediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Animation => "animation",
            Self::Audio => "audio",
            Self::Document => "document",
        }
    }
}

impl InputMedia {
    pub fn new(kind: InputMediaKind, media: FileArg) -> Self {
        Self { kind, file: MediaFile::new(media), caption: MediaCaption::default() }
    }

    pub fn thumbnail(mut self, thumb: FileArg) -> Self {
        self.file.thumbnail = Some(thumb);
        self
    }

    pub fn cover(mut self, cover: FileArg) -> Self {
        self.file.cover = Some(cover);
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption.caption = Some(caption.into());
        self
    }

    /// Produces the JSON object the Bot API expects for this media item.
    /// `media`/`thumbnail`/`cover` must already have been rewritten to
    /// either a serializable reference or an `attach://` uri by the
    /// request builder's media-expansion pass (§4.1) before this is called.
    pub fn to_json_value(&self) -> crate::Result<serde_json::Value> {
        let mut obj = serde_json::Map::new();
        obj.insert("type".to_owned(), serde_json::Value::String(self.kind.as_str().to_owned()));
        obj.insert(
            "media".to_owned(),
            self.file.media.to_json_value().ok_or_else(unattached_upload_error)?,
        );
        if let Some(thumb) = &self.file.thumbnail {
            obj.insert("thumbnail".to_owned(), thumb.to_json_value().ok_or_else(unattached_upload_error)?);
        }
        if let Some(cover) = &self.file.cover {
            obj.insert("cover".to_owned(), cover.to_json_value().ok_or_else(unattached_upload_error)?);
        }
        if let Some(caption) = &self.caption.caption {
            obj.insert("caption".to_owned(), serde_json::Value::String(caption.clone()));
        }
        if let Some(parse_mode) = &self.caption.parse_mode {
            obj.insert("parse_mode".to_owned(), serde_json::Value::String(parse_mode.clone()));
        }
        Ok(serde_json::Value::Object(obj))
    }
}

/// A single element of `sendPaidMedia`'s media array. Unlike [`InputMedia`]
/// it carries no per-item caption — `sendPaidMedia` takes one caption for
/// the whole call — but embeds its own upload the same way and goes
/// through the same attach-id rewrite.
#[derive(Clone, Debug)]
pub struct InputPaidMedia {
    pub kind: InputPaidMediaKind,
    pub file: MediaFile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputPaidMediaKind {
    Photo,
    Video,
}

impl InputPaidMediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
        }
    }
}

impl InputPaidMedia {
    pub fn new(kind: InputPaidMediaKind, media: FileArg) -> Self {
        Self { kind, file: MediaFile::new(media) }
    }

    pub fn thumbnail(mut self, thumb: FileArg) -> Self {
        self.file.thumbnail = Some(thumb);
        self
    }

    /// Produces the JSON object the Bot API expects for this paid-media
    /// item. `media`/`thumbnail` must already have been rewritten to either
    /// a serializable reference or an `attach://` uri by the request
    /// builder's media-expansion pass (§4.1) before this is called.
    pub fn to_json_value(&self) -> crate::Result<serde_json::Value> {
        let mut obj = serde_json::Map::new();
        obj.insert("type".to_owned(), serde_json::Value::String(self.kind.as_str().to_owned()));
        obj.insert(
            "media".to_owned(),
            self.file.media.to_json_value().ok_or_else(unattached_upload_error)?,
        );
        if let Some(thumb) = &self.file.thumbnail {
            obj.insert("thumbnail".to_owned(), thumb.to_json_value().ok_or_else(unattached_upload_error)?);
        }
        Ok(serde_json::Value::Object(obj))
    }
}

fn unattached_upload_error() -> crate::Error {
    use serde::de::Error as _;
    crate::Error::invalid_json(
        serde_json::Error::custom("media upload was not assigned an attach address before encoding"),
        "",
    )
}
