//! The filter algebra of §4.7: `All`/`Any`/`Not` composites over a `Filter`
//! primitive, plus the built-in predicates.

use crate::types::{ChatType, Message, MessageKind, Update};

/// A predicate over an [`Update`]. Implemented by closures via the blanket
/// impl below, and by the composite/built-in types in this module.
///
/// Returns `Result<bool>` rather than a bare `bool` so a predicate that
/// needs to fail (a malformed regex input, a lookup that errors) can
/// surface that failure through the router's error handler instead of
/// silently coercing it to `false` (§4.7).
pub trait Filter: Send + Sync {
    fn test(&self, update: &Update) -> crate::Result<bool>;
}

impl<F> Filter for F
where
    F: Fn(&Update) -> bool + Send + Sync,
{
    fn test(&self, update: &Update) -> crate::Result<bool> {
        Ok(self(update))
    }
}

/// True iff every inner filter is true; short-circuits on the first
/// `false` or the first predicate error.
pub struct All(pub Vec<Box<dyn Filter>>);

impl Filter for All {
    fn test(&self, update: &Update) -> crate::Result<bool> {
        for f in &self.0 {
            if !f.test(update)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// True iff any inner filter is true; short-circuits on the first `true`
/// or the first predicate error.
pub struct Any(pub Vec<Box<dyn Filter>>);

impl Filter for Any {
    fn test(&self, update: &Update) -> crate::Result<bool> {
        for f in &self.0 {
            if f.test(update)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Inverts an inner filter; propagates the inner filter's error unchanged.
pub struct Not(pub Box<dyn Filter>);

impl Filter for Not {
    fn test(&self, update: &Update) -> crate::Result<bool> {
        Ok(!self.0.test(update)?)
    }
}

/// True iff the message text (not caption) begins with `/name` or one of
/// its aliases, optionally suffixed with `@<botusername>`, per §4.7.
pub struct Command {
    names: Vec<String>,
    bot_username: Option<String>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self { names: vec![name.into()], bot_username: None }
    }

    pub fn with_aliases(name: impl Into<String>, aliases: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut names = vec![name.into()];
        names.extend(aliases.into_iter().map(Into::into));
        Self { names, bot_username: None }
    }

    /// Restricts the `@botusername` suffix match to this bot's cached
    /// identity; without it, any `@suffix` is accepted.
    pub fn bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    fn matches_text(&self, text: &str) -> bool {
        let Some(first_word) = text.split_whitespace().next() else { return false };
        let Some(command) = first_word.strip_prefix('/') else { return false };
        let (name, suffix) = match command.split_once('@') {
            Some((name, suffix)) => (name, Some(suffix)),
            None => (command, None),
        };
        if !self.names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            return false;
        }
        match (&self.bot_username, suffix) {
            (Some(expected), Some(actual)) => expected.eq_ignore_ascii_case(actual),
            _ => true,
        }
    }
}

impl Filter for Command {
    fn test(&self, update: &Update) -> crate::Result<bool> {
        Ok(update.msg().and_then(|m| m.text.as_deref()).is_some_and(|text| self.matches_text(text)))
    }
}

/// True iff the applicable text/caption (`Message::text_or_caption`)
/// matches the compiled regex.
pub struct Regexp(regex::Regex);

impl Regexp {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self(regex::Regex::new(pattern)?))
    }
}

impl Filter for Regexp {
    fn test(&self, update: &Update) -> crate::Result<bool> {
        Ok(update.msg().and_then(Message::text_or_caption).is_some_and(|text| self.0.is_match(text)))
    }
}

/// True iff the update's chat is of the given type.
pub struct ChatTypeFilter(pub ChatType);

impl Filter for ChatTypeFilter {
    fn test(&self, update: &Update) -> crate::Result<bool> {
        Ok(update.chat().is_some_and(|chat| chat.kind == self.0))
    }
}

/// True iff the update carries a message of the given classified kind.
pub struct MessageTypeFilter(pub MessageKind);

impl Filter for MessageTypeFilter {
    fn test(&self, update: &Update) -> crate::Result<bool> {
        Ok(update.msg().is_some_and(|m| m.kind() == self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_with_text(text: &str) -> Update {
        serde_json::from_value(serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 1,
                "date": 1700000000,
                "chat": {"id": 1, "type": "private"},
                "text": text,
            },
        }))
        .unwrap()
    }

    #[test]
    fn command_matches_bare_slash_name() {
        let filter = Command::new("start");
        assert!(filter.test(&update_with_text("/start")).unwrap());
        assert!(!filter.test(&update_with_text("start")).unwrap());
    }

    #[test]
    fn command_matches_username_suffix_for_this_bot() {
        let filter = Command::new("start").bot_username("mybot");
        assert!(filter.test(&update_with_text("/start@mybot")).unwrap());
        assert!(!filter.test(&update_with_text("/start@otherbot")).unwrap());
    }

    #[test]
    fn command_checks_aliases() {
        let filter = Command::with_aliases("help", ["h"]);
        assert!(filter.test(&update_with_text("/h")).unwrap());
    }

    #[test]
    fn all_short_circuits_on_first_false() {
        let filter = All(vec![Box::new(Command::new("start")), Box::new(Command::new("stop"))]);
        assert!(!filter.test(&update_with_text("/start")).unwrap());
    }

    #[test]
    fn any_matches_first_true() {
        let filter = Any(vec![Box::new(Command::new("start")), Box::new(Command::new("stop"))]);
        assert!(filter.test(&update_with_text("/stop")).unwrap());
    }

    #[test]
    fn not_inverts_inner_filter() {
        let filter = Not(Box::new(Command::new("start")));
        assert!(!filter.test(&update_with_text("/start")).unwrap());
        assert!(filter.test(&update_with_text("hello")).unwrap());
    }

    #[test]
    fn regexp_matches_text_or_caption() {
        let filter = Regexp::new(r"^\d+$").unwrap();
        assert!(filter.test(&update_with_text("12345")).unwrap());
        assert!(!filter.test(&update_with_text("not a number")).unwrap());
    }

    struct Failing;

    impl Filter for Failing {
        fn test(&self, _update: &Update) -> crate::Result<bool> {
            Err(crate::Error::Config("predicate blew up".to_owned()))
        }
    }

    #[test]
    fn all_propagates_a_predicate_error() {
        let filter = All(vec![Box::new(Command::new("start")), Box::new(Failing)]);
        assert!(filter.test(&update_with_text("/start")).is_err());
    }

    #[test]
    fn any_propagates_a_predicate_error_before_a_later_match() {
        let filter = Any(vec![Box::new(Failing), Box::new(Command::new("start"))]);
        assert!(filter.test(&update_with_text("/start")).is_err());
    }

    #[test]
    fn not_propagates_the_inner_predicate_error() {
        let filter = Not(Box::new(Failing));
        assert!(filter.test(&update_with_text("/start")).is_err());
    }
}
