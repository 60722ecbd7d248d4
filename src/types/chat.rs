use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
    Sender,
}

/// A chat: private, group, supergroup, or channel.
///
/// [The official docs](https://core.telegram.org/bots/api#chat).
#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,

    #[serde(rename = "type")]
    pub kind: ChatType,

    pub title: Option<String>,

    pub username: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    #[serde(default)]
    pub is_forum: bool,
}

impl Chat {
    pub fn new(id: i64, kind: ChatType) -> Self {
        Self {
            id,
            kind,
            title: None,
            username: None,
            first_name: None,
            last_name: None,
            is_forum: false,
        }
    }

    pub fn is_private(&self) -> bool {
        self.kind == ChatType::Private
    }
}
