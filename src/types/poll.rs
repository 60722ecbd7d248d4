use serde::{Deserialize, Serialize};

use crate::types::MessageEntity;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollType {
    Regular,
    Quiz,
}

/// This object contains information about a poll.
///
/// [The official docs](https://core.telegram.org/bots/api#poll).
#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    /// Unique poll identifier.
    pub id: String,

    /// Poll question, 1-300 characters.
    pub question: String,

    /// List of poll options.
    pub options: Vec<PollOption>,

    /// `true`, if the poll is closed.
    pub is_closed: bool,

    /// Total number of users that voted in the poll.
    pub total_voter_count: i32,

    /// `true`, if the poll is anonymous.
    pub is_anonymous: bool,

    /// Poll type, currently can be "regular" or "quiz".
    #[serde(rename = "type")]
    pub poll_type: PollType,

    /// `true`, if the poll allows multiple answers.
    pub allows_multiple_answers: bool,

    /// 0-based identifier of the correct answer option. Available only for
    /// polls in the quiz mode, which are closed or were sent (not
    /// forwarded) by the bot.
    pub correct_option_id: Option<i32>,

    /// Text shown when a user chooses an incorrect answer in a quiz.
    pub explanation: Option<String>,

    /// Special entities in the explanation.
    pub explanation_entities: Option<Vec<MessageEntity>>,

    /// Amount of time in seconds the poll will be active after creation.
    pub open_period: Option<i32>,

    /// Point in time (Unix timestamp) when the poll is automatically closed.
    pub close_date: Option<i32>,
}

impl Poll {
    #[allow(clippy::too_many_arguments)]
    pub fn new<S1, S2, O>(
        id: S1,
        question: S2,
        options: O,
        is_closed: bool,
        total_voter_count: i32,
        is_anonymous: bool,
        poll_type: PollType,
        allows_multiple_answers: bool,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        O: Into<Vec<PollOption>>,
    {
        Self {
            id: id.into(),
            question: question.into(),
            options: options.into(),
            is_closed,
            total_voter_count,
            is_anonymous,
            poll_type,
            allows_multiple_answers,
            correct_option_id: None,
            explanation: None,
            explanation_entities: None,
            open_period: None,
            close_date: None,
        }
    }

    pub fn correct_option_id(mut self, val: i32) -> Self {
        self.correct_option_id = Some(val);
        self
    }

    pub fn explanation<S>(mut self, val: S) -> Self
    where
        S: Into<String>,
    {
        self.explanation = Some(val.into());
        self
    }
}

/// One answer option in a poll.
///
/// [The official docs](https://core.telegram.org/bots/api#polloption).
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    pub voter_count: i32,
}

impl PollOption {
    pub fn new<S>(text: S, voter_count: i32) -> Self
    where
        S: Into<String>,
    {
        Self { text: text.into(), voter_count }
    }
}

/// A user's answer to a non-anonymous poll.
///
/// [The official docs](https://core.telegram.org/bots/api#pollanswer).
#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct PollAnswer {
    pub poll_id: String,
    pub voter_chat: Option<super::Chat>,
    pub user: Option<super::User>,
    pub option_ids: Vec<i32>,
}
