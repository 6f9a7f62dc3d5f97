use std::sync::Arc;

use tracing::{debug, info, warn};

use {
    magpie_channels::{InboundMessage, MessageKind, Talker},
    magpie_config::MagpieConfig,
    magpie_knowledge::{KnowledgeStore, WikiStore},
    magpie_persist::{self as persist, RemoteStore},
    magpie_providers::{CompletionBackend, ImageBackend},
    magpie_sessions::SessionStore,
};

use crate::{
    commands::{self, Command},
    reply::{self, MAX_CHUNK_CHARS},
    tasks::TaskResolver,
    trigger::TriggerClassifier,
};

/// Sent instead of an empty or failed AI reply. Never a stack trace.
const APOLOGY: &str = "Sorry, please try again later. 😔";

/// Image generation prefix, checked on the raw text before any mention
/// stripping — `"@Bot /img x"` is therefore a chat message, not an image
/// request.
const IMAGE_PREFIX: &str = "/img";

/// Platform notification bodies that are never worth processing.
const SYSTEM_NOTICES: &[&str] = &[
    "收到一条视频/语音聊天消息，请在手机上查看",
    "收到红包，请在手机上查看",
    "收到转账，请在手机上查看",
    "/cgi-bin/mmwebwx-bin/webwxgetpubliclinkimg",
];

/// Why the nonsense filter dropped a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    SelfSender,
    UnsupportedKind,
    SystemAccount,
    SystemNotice,
    BlockedWord,
}

/// The handling path a message took. Exactly one per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dropped(DropReason),
    Command,
    Task,
    Image,
    Chat,
    Ignored,
}

/// Top-level dispatcher: sequences the nonsense filter, commands, task
/// keywords, image generation, and AI forwarding. Holds no mutable state
/// of its own — all state lives in the injected stores.
pub struct Dispatcher {
    trigger: TriggerClassifier,
    resolver: TaskResolver,
    sessions: Arc<SessionStore>,
    completion: Arc<dyn CompletionBackend>,
    image: Arc<dyn ImageBackend>,
    remote: Option<Arc<dyn RemoteStore>>,
    system_accounts: Vec<String>,
    block_words: Vec<String>,
    output_block_words: Vec<String>,
    disable_group_message: bool,
}

impl Dispatcher {
    pub fn new(
        cfg: &MagpieConfig,
        sessions: Arc<SessionStore>,
        knowledge: Arc<KnowledgeStore>,
        wiki: Arc<WikiStore>,
        completion: Arc<dyn CompletionBackend>,
        image: Arc<dyn ImageBackend>,
        remote: Option<Arc<dyn RemoteStore>>,
    ) -> Result<Self, regex::Error> {
        let trigger = TriggerClassifier::new(
            &cfg.chat.bot_name,
            cfg.chat.trigger_rule.as_deref(),
            cfg.chat.private_trigger_keyword.as_deref(),
        )?;
        let resolver = TaskResolver::new(
            cfg.resolver.clone(),
            Arc::clone(&sessions),
            knowledge,
            wiki,
        );
        Ok(Self {
            trigger,
            resolver,
            sessions,
            completion,
            image,
            remote,
            system_accounts: cfg.filter.system_accounts.clone(),
            block_words: cfg.filter.block_words.clone(),
            output_block_words: cfg.filter.output_block_words.clone(),
            disable_group_message: cfg.chat.disable_group_message,
        })
    }

    /// Handle one inbound message to completion, including all awaited
    /// backend calls and outbound sends. Returns the route taken.
    pub async fn handle(&self, msg: &InboundMessage, talker: &dyn Talker) -> anyhow::Result<Route> {
        if let Some(reason) = self.drop_reason(msg) {
            debug!(sender = %msg.sender, ?reason, "dropping message");
            return Ok(Route::Dropped(reason));
        }

        if let Some(command) = commands::parse(&msg.body) {
            info!(sender = %msg.sender, "command: {}", msg.body);
            self.run_command(command, msg, talker).await?;
            return Ok(Route::Command);
        }

        if let Some(task) = self.resolver.resolve(&msg.sender, &msg.body) {
            if let (Some(remote), Some(entry)) = (&self.remote, &task.taught) {
                persist::save_knowledge_detached(
                    Arc::clone(remote),
                    entry.key.clone(),
                    entry.value.clone(),
                    entry.contributor.clone(),
                );
            }
            self.send_reply(msg, talker, &msg.body, &task.text).await?;
            return Ok(Route::Task);
        }

        if let Some(prompt) = msg.body.strip_prefix(IMAGE_PREFIX) {
            info!(sender = %msg.sender, "image request: {}", msg.body);
            self.run_image(prompt.trim(), msg, talker).await?;
            return Ok(Route::Image);
        }

        if self.trigger.should_trigger(&msg.body, msg.is_private()) {
            if !msg.is_private() && self.disable_group_message {
                return Ok(Route::Ignored);
            }
            self.run_chat(msg, talker).await?;
            return Ok(Route::Chat);
        }

        Ok(Route::Ignored)
    }

    fn drop_reason(&self, msg: &InboundMessage) -> Option<DropReason> {
        if msg.from_self {
            return Some(DropReason::SelfSender);
        }
        if !matches!(msg.kind, MessageKind::Text | MessageKind::Audio) {
            return Some(DropReason::UnsupportedKind);
        }
        if self.system_accounts.iter().any(|a| a == &msg.sender) {
            return Some(DropReason::SystemAccount);
        }
        if SYSTEM_NOTICES.iter().any(|n| msg.body.contains(n)) {
            return Some(DropReason::SystemNotice);
        }
        if reply::contains_blocked(&msg.body, &self.block_words) {
            return Some(DropReason::BlockedWord);
        }
        None
    }

    async fn run_command(
        &self,
        command: Command,
        msg: &InboundMessage,
        talker: &dyn Talker,
    ) -> anyhow::Result<()> {
        let key = msg.conversation_key();
        match command {
            Command::Help => self.try_say(talker, commands::HELP_TEXT).await?,
            Command::Prompt(prompt) => self.sessions.set_system_prompt(key, &prompt),
            Command::Clear => self.sessions.reset(key),
            // Unrecognized commands are silently ignored.
            Command::Unknown => {},
        }
        Ok(())
    }

    async fn run_image(
        &self,
        prompt: &str,
        msg: &InboundMessage,
        talker: &dyn Talker,
    ) -> anyhow::Result<()> {
        let key = msg.conversation_key();
        match self.image.generate(key, prompt).await {
            Ok(url) => talker.say_image(&url).await?,
            Err(e) => {
                warn!(key, error = %e, "image generation failed");
                self.try_say(talker, APOLOGY).await?;
            },
        }
        Ok(())
    }

    async fn run_chat(&self, msg: &InboundMessage, talker: &dyn Talker) -> anyhow::Result<()> {
        let key = msg.conversation_key();
        let text = self.trigger.clean_message(&msg.body, msg.is_private());

        let outcome = self.sessions.append_user(key, &text);
        if outcome.leveled_up
            && let Some(remote) = &self.remote
        {
            persist::save_user_detached(Arc::clone(remote), key.to_string(), outcome.level);
        }

        let history = self.sessions.history(key);
        let answer = match self.completion.complete(key, &history).await {
            Ok(answer) if !answer.is_empty() => {
                self.sessions.append_assistant(key, &answer);
                answer
            },
            Ok(_) => APOLOGY.to_string(),
            Err(e) => {
                // Terminal for this message; no retry.
                warn!(key, error = %e, "completion failed");
                APOLOGY.to_string()
            },
        };

        self.send_reply(msg, talker, &text, &answer).await
    }

    /// Send a task or chat reply, applying the group envelope and the
    /// group disable flag.
    async fn send_reply(
        &self,
        msg: &InboundMessage,
        talker: &dyn Talker,
        original: &str,
        answer: &str,
    ) -> anyhow::Result<()> {
        if msg.is_private() {
            return self.try_say(talker, answer).await;
        }
        if self.disable_group_message {
            return Ok(());
        }
        let formatted = reply::format_group_reply(&msg.sender, original, answer);
        self.try_say(talker, &formatted).await
    }

    /// Screen outbound text against the output block list, then send it
    /// in order-preserving chunks, awaiting each send.
    async fn try_say(&self, talker: &dyn Talker, text: &str) -> anyhow::Result<()> {
        if reply::contains_blocked(text, &self.output_block_words) {
            warn!("blocked outbound reply: {text}");
            return Ok(());
        }
        for chunk in reply::split_chunks(text, MAX_CHUNK_CHARS) {
            talker.say_text(&chunk).await?;
        }
        Ok(())
    }
}
