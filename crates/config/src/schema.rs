use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Top-level configuration. Every section and field has a default so an
/// empty file (or no file at all) yields a working setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MagpieConfig {
    pub chat: ChatConfig,
    pub filter: FilterConfig,
    pub provider: ProviderConfig,
    pub persist: PersistConfig,
    pub resolver: ResolverConfig,
}

/// Trigger and reply behavior of the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// The bot's own display name, used to build the group `@mention`
    /// pattern. May contain regex metacharacters; they are escaped.
    pub bot_name: String,

    /// Keyword that gates private chats. `None` means private chats are
    /// open (every text message reaches the AI path).
    pub private_trigger_keyword: Option<String>,

    /// Regex rule applied in both scopes. In groups it must match the
    /// text after the mention is stripped.
    pub trigger_rule: Option<String>,

    /// Suppress all group replies; private replies are unaffected.
    pub disable_group_message: bool,

    /// Default system prompt for new and reset sessions.
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_name: "magpie".into(),
            private_trigger_keyword: None,
            trigger_rule: None,
            disable_group_message: false,
            system_prompt: "You are a helpful assistant.".into(),
        }
    }
}

/// Inbound/outbound word filters and reserved sender names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Inbound messages containing any of these are silently dropped.
    pub block_words: Vec<String>,

    /// Outbound replies containing any of these are logged and suppressed
    /// entirely (no partial send).
    pub output_block_words: Vec<String>,

    /// Sender names belonging to the platform itself; their messages are
    /// never processed.
    pub system_accounts: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            block_words: Vec::new(),
            output_block_words: Vec::new(),
            system_accounts: vec!["微信团队".into()],
        }
    }
}

/// OpenAI-compatible backend endpoint.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_base: String,

    #[serde(serialize_with = "serialize_secret")]
    pub api_key: Secret<String>,

    pub model: String,

    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com".into(),
            api_key: Secret::new(String::new()),
            model: "gpt-3.5-turbo".into(),
            temperature: 0.6,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Optional write-behind persistence endpoint. `None` disables remote
/// saves entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistConfig {
    pub api_base: Option<String>,
}

/// Which store the teach keyword writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeachStore {
    /// Append-merge store with substring lookup.
    #[default]
    Knowledge,
    /// Exact-key store with independent entries per teach.
    Wiki,
}

/// Reputation tier names, lowest to highest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierLabels {
    pub below_zero: String,
    pub tier1: String,
    pub tier2: String,
    pub tier3: String,
    pub top: String,
}

impl Default for TierLabels {
    fn default() -> Self {
        Self {
            below_zero: "小赤佬".into(),
            tier1: "大佬".into(),
            tier2: "巨佬".into(),
            tier3: "神佬".into(),
            top: "传说之佬".into(),
        }
    }
}

/// Task-keyword matcher data. The matcher *order* is fixed in code; the
/// phrases and reply texts are configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Self-deprecating phrases that trigger a rank reply.
    pub rank_query_phrases: Vec<String>,

    /// Phrases that trigger the leaderboard reply.
    pub leaderboard_phrases: Vec<String>,

    /// Teach prefixes; key and value follow, space-delimited.
    pub teach_prefixes: Vec<String>,

    pub tier_labels: TierLabels,

    /// Placeholders: `{tier}`, `{level}`.
    pub rank_reply_template: String,

    /// Placeholder: `{names}`.
    pub leaderboard_reply_template: String,

    /// Placeholder: `{id}`.
    pub teach_reply_template: String,

    pub teach_store: TeachStore,

    /// Minimum level (exclusive) to appear on the leaderboard.
    pub leaderboard_min_level: i64,

    /// Leaderboard is truncated to this many names.
    pub leaderboard_limit: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            rank_query_phrases: vec!["不是大佬".into(), "我是垃圾".into(), "不是佬".into()],
            leaderboard_phrases: vec!["谁是大佬".into(), "本群大佬".into()],
            teach_prefixes: vec!["学习 ".into(), "指令 ".into()],
            tier_labels: TierLabels::default(),
            rank_reply_template: "经过您的历史发言分析：您当前段位为{tier}，佬的级别为：{level}级"
                .into(),
            leaderboard_reply_template: "本群排名前十的大佬有 {names}".into(),
            teach_reply_template: "感谢您提供的新知识，我记住啦，知识编号：{id}".into(),
            teach_store: TeachStore::default(),
            leaderboard_min_level: 10,
            leaderboard_limit: 10,
        }
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
