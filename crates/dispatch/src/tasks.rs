//! Ordered task-keyword matchers that short-circuit the AI path with
//! locally computed responses.
//!
//! The rules are an explicit priority list ([`RULE_ORDER`]) evaluated in
//! a single first-match-wins pass. A message that matches both a rank
//! phrase and a stored knowledge key resolves as a rank query — order is
//! part of the contract, not an accident.

use std::sync::Arc;

use tracing::debug;

use {
    magpie_config::{ResolverConfig, TeachStore},
    magpie_knowledge::{KnowledgeEntry, KnowledgeStore, WikiStore},
    magpie_sessions::SessionStore,
};

/// The four task rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRule {
    RankQuery,
    Leaderboard,
    Teach,
    Lookup,
}

/// Priority order. First match wins; later rules are not consulted.
pub const RULE_ORDER: [TaskRule; 4] = [
    TaskRule::RankQuery,
    TaskRule::Leaderboard,
    TaskRule::Teach,
    TaskRule::Lookup,
];

/// A resolved task response. `taught` carries the stored entry when the
/// Teach rule fired, so the caller can mirror it to remote persistence.
#[derive(Debug, Clone)]
pub struct TaskReply {
    pub text: String,
    pub taught: Option<KnowledgeEntry>,
}

impl TaskReply {
    fn plain(text: String) -> Self {
        Self { text, taught: None }
    }
}

/// Applies the task rules against the injected stores.
pub struct TaskResolver {
    cfg: ResolverConfig,
    sessions: Arc<SessionStore>,
    knowledge: Arc<KnowledgeStore>,
    wiki: Arc<WikiStore>,
}

impl TaskResolver {
    pub fn new(
        cfg: ResolverConfig,
        sessions: Arc<SessionStore>,
        knowledge: Arc<KnowledgeStore>,
        wiki: Arc<WikiStore>,
    ) -> Self {
        Self {
            cfg,
            sessions,
            knowledge,
            wiki,
        }
    }

    /// Run the rule chain. `None` means no task matched and the message
    /// continues down the dispatch pipeline.
    pub fn resolve(&self, sender: &str, text: &str) -> Option<TaskReply> {
        for rule in RULE_ORDER {
            if let Some(reply) = self.apply(rule, sender, text) {
                debug!(?rule, sender, "task rule matched");
                return Some(reply);
            }
        }
        None
    }

    fn apply(&self, rule: TaskRule, sender: &str, text: &str) -> Option<TaskReply> {
        match rule {
            TaskRule::RankQuery => self.rank_query(sender, text),
            TaskRule::Leaderboard => self.leaderboard(text),
            TaskRule::Teach => self.teach(sender, text),
            TaskRule::Lookup => self.lookup(text),
        }
    }

    fn rank_query(&self, sender: &str, text: &str) -> Option<TaskReply> {
        if !contains_any(text, &self.cfg.rank_query_phrases) {
            return None;
        }
        // A sender the store has never seen has no rank; fall through.
        let level = self.sessions.level(sender)?;
        let reply = self
            .cfg
            .rank_reply_template
            .replace("{tier}", self.tier_label(level))
            .replace("{level}", &level.to_string());
        Some(TaskReply::plain(reply))
    }

    fn leaderboard(&self, text: &str) -> Option<TaskReply> {
        if !contains_any(text, &self.cfg.leaderboard_phrases) {
            return None;
        }
        let names = self
            .sessions
            .leaderboard(self.cfg.leaderboard_min_level, self.cfg.leaderboard_limit)
            .join(", ");
        let reply = self.cfg.leaderboard_reply_template.replace("{names}", &names);
        Some(TaskReply::plain(reply))
    }

    fn teach(&self, sender: &str, text: &str) -> Option<TaskReply> {
        let rest = self
            .cfg
            .teach_prefixes
            .iter()
            .find_map(|prefix| text.strip_prefix(prefix.as_str()))?;
        // Malformed teach (no key/value split) is silently ignored.
        let (key, value) = rest.split_once(' ')?;
        if key.is_empty() || value.is_empty() {
            return None;
        }

        let (entry, id) = match self.cfg.teach_store {
            TeachStore::Knowledge => {
                let entry = self.knowledge.teach(key, value, sender);
                (entry, self.knowledge.len() + 1)
            },
            TeachStore::Wiki => {
                let entry = self.wiki.teach(key, value, sender);
                (entry, self.wiki.len() + 1)
            },
        };
        // Best-effort sequential id; not unique under concurrent teaches.
        let reply = self.cfg.teach_reply_template.replace("{id}", &id.to_string());
        Some(TaskReply {
            text: reply,
            taught: Some(entry),
        })
    }

    fn lookup(&self, text: &str) -> Option<TaskReply> {
        let mut parts = Vec::new();
        if let Some(value) = self.wiki.lookup(text) {
            parts.push(value);
        }
        if let Some(value) = self.knowledge.lookup(text) {
            parts.push(value);
        }
        if parts.is_empty() {
            return None;
        }
        Some(TaskReply::plain(parts.join("\n")))
    }

    fn tier_label(&self, level: i64) -> &str {
        let tiers = &self.cfg.tier_labels;
        if level < 0 {
            &tiers.below_zero
        } else if level <= 10 {
            &tiers.tier1
        } else if level <= 20 {
            &tiers.tier2
        } else if level <= 30 {
            &tiers.tier3
        } else {
            &tiers.top
        }
    }
}

fn contains_any(text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|p| text.contains(p.as_str()))
}
