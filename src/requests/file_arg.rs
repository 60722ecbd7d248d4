//! The [`FileArg`] sum type and the raw bytes an [`Upload`] streams from.

use std::{fmt, sync::Arc};

use serde::Serialize;

/// A readable source for an upload: either an owned buffer or a path to a
/// local file read lazily at encode time.
#[derive(Clone)]
pub enum FileSource {
    Memory(Arc<[u8]>),
    Path(Arc<std::path::Path>),
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(bytes) => f.debug_tuple("Memory").field(&bytes.len()).finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

/// A pending upload: a file name, its bytes, and an optional synthetic
/// `attach://` address assigned once it is embedded inside a media object.
#[derive(Clone, Debug)]
pub struct Upload {
    pub file_name: String,
    pub source: FileSource,
    pub attach_name: Option<String>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self { file_name: file_name.into(), source: FileSource::Memory(bytes.into()), attach_name: None }
    }

    pub fn from_path(path: impl Into<std::path::PathBuf>) -> Self {
        let path: std::path::PathBuf = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_owned());
        Self { file_name, source: FileSource::Path(Arc::from(path)), attach_name: None }
    }

    /// The `attach://<id>` URI this upload must be referenced by once it has
    /// been assigned an attachment id, or `None` if it hasn't.
    pub fn attach_uri(&self) -> Option<String> {
        self.attach_name.as_ref().map(|name| format!("attach://{name}"))
    }
}

/// The sum type by which an outbound file reference is expressed.
///
/// Exactly one of the three representatives is ever populated; constructing
/// one always goes through one of the associated functions below so that
/// invariant can't be violated from outside this module.
#[derive(Clone, Debug)]
pub enum FileArg {
    /// A `file_id` already known to the Bot API.
    FileId(String),
    /// A URL the Bot API will fetch itself.
    Url(String),
    /// A file to be streamed up as a multipart part.
    Upload(Upload),
}

impl FileArg {
    pub fn file_id(id: impl Into<String>) -> Self {
        Self::FileId(id.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn upload(upload: Upload) -> Self {
        Self::Upload(upload)
    }

    /// The JSON value this argument marshals to, or `None` for a pure
    /// upload with no assigned attach address (not JSON-serializable; see
    /// §3 of the spec).
    pub fn to_json_value(&self) -> Option<serde_json::Value> {
        match self {
            Self::FileId(id) => Some(serde_json::Value::String(id.clone())),
            Self::Url(url) => Some(serde_json::Value::String(url.clone())),
            Self::Upload(upload) => upload.attach_uri().map(serde_json::Value::String),
        }
    }

    pub fn is_upload(&self) -> bool {
        matches!(self, Self::Upload(_))
    }

    pub fn as_upload(&self) -> Option<&Upload> {
        match self {
            Self::Upload(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_upload_mut(&mut self) -> Option<&mut Upload> {
        match self {
            Self::Upload(u) => Some(u),
            _ => None,
        }
    }
}

impl Serialize for FileArg {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.to_json_value() {
            Some(value) => value.serialize(serializer),
            None => Err(serde::ser::Error::custom(
                "a pure upload with no attach address is not JSON-serializable",
            )),
        }
    }
}
