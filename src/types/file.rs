//! The `getFile` result type — metadata plus the relative path used to
//! build a download URL (§4.4).

use serde::{Deserialize, Serialize};

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub file_id: String,
    pub file_unique_id: String,
    pub file_size: Option<u32>,
    /// Absent when the file is larger than the Bot API's downloadable-size
    /// limit; callers must check before calling `download_file`.
    pub file_path: Option<String>,
}

impl File {
    pub fn is_downloadable(&self) -> bool {
        self.file_path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_path_is_not_downloadable() {
        let file = File { file_id: "a".into(), file_unique_id: "b".into(), file_size: None, file_path: None };
        assert!(!file.is_downloadable());
    }
}
