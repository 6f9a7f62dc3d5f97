use std::{
    collections::HashMap,
    sync::RwLock,
};

use tracing::debug;

use magpie_common::ChatRecord;

use crate::tokens;

/// A user message longer than this many characters earns one level point.
const LEVEL_MESSAGE_THRESHOLD: usize = 10;

/// What `append_user` did to the sender's reputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    pub level: i64,
    pub leveled_up: bool,
}

struct Session {
    history: Vec<ChatRecord>,
    level: i64,
}

/// In-memory store of per-conversation history and levels.
///
/// Keys are conversation identities: a room topic for group chats, a
/// contact name for private chats. Sessions are created lazily on first
/// touch and live for the whole process.
///
/// Invariant: `history[0]` is always the system prompt. Eviction removes
/// at index 1 and never shrinks a history below one element; `reset`
/// replaces the history with a single fresh system prompt.
///
/// All mutation happens under a single `RwLock`, so read-modify-write on
/// one key is atomic even when conversations are handled concurrently.
pub struct SessionStore {
    inner: RwLock<HashMap<String, Session>>,
    default_prompt: String,
}

impl SessionStore {
    pub fn new(default_prompt: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            default_prompt: default_prompt.into(),
        }
    }

    fn fresh_session(&self) -> Session {
        Session {
            history: vec![ChatRecord::system(self.default_prompt.clone())],
            level: 0,
        }
    }

    /// Append a user message, evicting old history first and applying the
    /// reputation side effect: one level point per message longer than
    /// ten characters.
    pub fn append_user(&self, key: &str, text: &str) -> AppendOutcome {
        let mut map = self.inner.write().unwrap();
        let session = map
            .entry(key.to_string())
            .or_insert_with(|| self.fresh_session());
        evict(&mut session.history);
        session.history.push(ChatRecord::user(text));

        let leveled_up = text.chars().count() > LEVEL_MESSAGE_THRESHOLD;
        if leveled_up {
            session.level += 1;
            debug!(key, level = session.level, "level increased");
        }
        AppendOutcome {
            level: session.level,
            leveled_up,
        }
    }

    /// Append an assistant reply, evicting old history first.
    pub fn append_assistant(&self, key: &str, text: &str) {
        let mut map = self.inner.write().unwrap();
        let session = map
            .entry(key.to_string())
            .or_insert_with(|| self.fresh_session());
        evict(&mut session.history);
        session.history.push(ChatRecord::assistant(text));
    }

    /// Replace the active system prompt. History and level are untouched.
    pub fn set_system_prompt(&self, key: &str, prompt: &str) {
        let mut map = self.inner.write().unwrap();
        let session = map
            .entry(key.to_string())
            .or_insert_with(|| self.fresh_session());
        session.history[0] = ChatRecord::system(prompt);
    }

    /// Drop all history and restore the default system prompt. The level
    /// counter survives resets.
    pub fn reset(&self, key: &str) {
        let mut map = self.inner.write().unwrap();
        let fresh = self.fresh_session();
        match map.get_mut(key) {
            Some(session) => session.history = fresh.history,
            None => {
                map.insert(key.to_string(), fresh);
            },
        }
    }

    /// Snapshot of the conversation history. Creates the session if it
    /// does not exist yet, so the result always starts with a system
    /// prompt.
    pub fn history(&self, key: &str) -> Vec<ChatRecord> {
        let mut map = self.inner.write().unwrap();
        map.entry(key.to_string())
            .or_insert_with(|| self.fresh_session())
            .history
            .clone()
    }

    /// Current level for a known user, `None` for users never seen. Reads
    /// do not create sessions.
    pub fn level(&self, key: &str) -> Option<i64> {
        let map = self.inner.read().unwrap();
        map.get(key).map(|s| s.level)
    }

    /// Usernames with `level > min_level`, level-descending, at most
    /// `limit` entries.
    pub fn leaderboard(&self, min_level: i64, limit: usize) -> Vec<String> {
        let map = self.inner.read().unwrap();
        let mut ranked: Vec<(&String, i64)> = map
            .iter()
            .filter(|(_, s)| s.level > min_level)
            .map(|(k, s)| (k, s.level))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(limit)
            .map(|(k, _)| k.clone())
            .collect()
    }
}

/// FIFO-trim from index 1 until the history fits the token budget. Index 0
/// (the system prompt) is never a candidate.
fn evict(history: &mut Vec<ChatRecord>) {
    while tokens::over_budget(history) && history.len() > 1 {
        history.remove(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magpie_common::Role;

    fn store() -> SessionStore {
        SessionStore::new("default prompt")
    }

    #[test]
    fn first_touch_creates_system_prompt() {
        let s = store();
        let history = s.history("alice");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, Role::System);
        assert_eq!(history[0].content, "default prompt");
    }

    #[test]
    fn append_keeps_system_prompt_at_index_zero() {
        let s = store();
        s.append_user("alice", "hello");
        s.append_assistant("alice", "hi there");
        let history = s.history("alice");
        assert_eq!(history[0].role, Role::System);
        assert_eq!(history[1], ChatRecord::user("hello"));
        assert_eq!(history[2], ChatRecord::assistant("hi there"));
    }

    #[test]
    fn eviction_is_fifo_and_spares_system_prompt() {
        let s = store();
        // Each message is 400 chars; the 2000-char budget fits the system
        // prompt plus four of them, so appending a sixth evicts the first.
        let filler = "x".repeat(400);
        for i in 0..6 {
            s.append_user("alice", &format!("{i}{}", &filler[1..]));
        }
        let history = s.history("alice");
        assert_eq!(history[0].role, Role::System);
        assert!(history.iter().all(|r| r.content != format!("0{}", &filler[1..])));
        // Most recent message always survives.
        let last = history.last().unwrap();
        assert!(last.content.starts_with('5'));
    }

    #[test]
    fn eviction_never_empties_history() {
        let s = store();
        let huge = "x".repeat(5000);
        s.append_user("alice", &huge);
        // The oversized message itself blows the budget; the next append
        // must still leave the system prompt plus the new message.
        s.append_user("alice", "next");
        let history = s.history("alice");
        assert!(history.len() >= 2);
        assert_eq!(history[0].role, Role::System);
        assert_eq!(history.last().unwrap().content, "next");
    }

    #[test]
    fn short_message_does_not_level_up() {
        let s = store();
        let outcome = s.append_user("alice", "hi");
        assert!(!outcome.leveled_up);
        assert_eq!(s.level("alice"), Some(0));
    }

    #[test]
    fn ten_chars_is_not_enough() {
        let s = store();
        let outcome = s.append_user("alice", "0123456789");
        assert!(!outcome.leveled_up);
        assert_eq!(outcome.level, 0);
    }

    #[test]
    fn eleven_chars_levels_up_once() {
        let s = store();
        let outcome = s.append_user("alice", "0123456789a");
        assert!(outcome.leveled_up);
        assert_eq!(outcome.level, 1);
        // One increment per qualifying message, regardless of length.
        let outcome = s.append_user("alice", &"y".repeat(300));
        assert_eq!(outcome.level, 2);
    }

    #[test]
    fn level_is_monotonic() {
        let s = store();
        let mut last = 0;
        for text in ["short", "a message over ten chars", "hi", "another long message here"] {
            let outcome = s.append_user("alice", text);
            assert!(outcome.level >= last);
            last = outcome.level;
        }
        assert_eq!(last, 2);
    }

    #[test]
    fn unknown_user_has_no_level() {
        let s = store();
        assert_eq!(s.level("nobody"), None);
    }

    #[test]
    fn reset_restores_default_prompt_but_keeps_level() {
        let s = store();
        s.append_user("alice", "a message over ten chars");
        s.set_system_prompt("alice", "be terse");
        s.reset("alice");
        let history = s.history("alice");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "default prompt");
        assert_eq!(s.level("alice"), Some(1));
    }

    #[test]
    fn set_prompt_replaces_only_index_zero() {
        let s = store();
        s.append_user("alice", "hello");
        s.set_system_prompt("alice", "be terse");
        let history = s.history("alice");
        assert_eq!(history[0].content, "be terse");
        assert_eq!(history[1].content, "hello");
    }

    #[test]
    fn leaderboard_sorts_descending_and_truncates() {
        let s = store();
        for (name, msgs) in [("low", 3), ("mid", 12), ("high", 20)] {
            for _ in 0..msgs {
                s.append_user(name, "a message over ten chars");
            }
        }
        let board = s.leaderboard(10, 10);
        assert_eq!(board, vec!["high".to_string(), "mid".to_string()]);
        let board = s.leaderboard(10, 1);
        assert_eq!(board, vec!["high".to_string()]);
    }

    #[test]
    fn leaderboard_excludes_boundary_level() {
        let s = store();
        for _ in 0..10 {
            s.append_user("ten", "a message over ten chars");
        }
        // level == 10 is not strictly greater than 10.
        assert!(s.leaderboard(10, 10).is_empty());
    }
}
