use {regex::Regex, tracing::info};

/// Literal run of dashes used by the transport to separate quoted or
/// forwarded context from the actual message. Only the text after the
/// last occurrence is forwarded to the AI.
pub const CONTEXT_SEPARATOR: &str = "- - - - - - - - - - - - - - -";

/// Decides whether a message reaches the AI path, and strips trigger
/// markers from messages that do.
///
/// Group chats require a leading `@<bot name>` mention; the bot's display
/// name is user-controlled, so it is regex-escaped before the mention
/// pattern is built (a name like `R2.D2*` must match literally).
pub struct TriggerClassifier {
    group_mention: Regex,
    trigger_rule: Option<Regex>,
    private_rule: Option<Regex>,
}

impl TriggerClassifier {
    /// `trigger_rule` applies in both scopes; `private_keyword` gates
    /// private chats when no rule is configured. With neither, private
    /// chats are open.
    pub fn new(
        bot_name: &str,
        trigger_rule: Option<&str>,
        private_keyword: Option<&str>,
    ) -> Result<Self, regex::Error> {
        let group_mention = Regex::new(&format!(r"^@{}\s", regex::escape(bot_name)))?;
        let trigger_rule = trigger_rule.map(Regex::new).transpose()?;
        let private_rule = match (&trigger_rule, private_keyword) {
            (Some(rule), _) => Some(rule.clone()),
            (None, Some(keyword)) => Some(Regex::new(&regex::escape(keyword))?),
            (None, None) => None,
        };
        Ok(Self {
            group_mention,
            trigger_rule,
            private_rule,
        })
    }

    /// Should this message be forwarded to the AI?
    pub fn should_trigger(&self, text: &str, is_private: bool) -> bool {
        let triggered = if is_private {
            self.private_rule
                .as_ref()
                .is_none_or(|rule| rule.is_match(text))
        } else {
            let mentioned = self.group_mention.is_match(text);
            match &self.trigger_rule {
                // The rule must also match the remainder after the mention.
                Some(rule) if mentioned => rule.is_match(&self.group_mention.replace(text, "")),
                Some(_) => false,
                None => mentioned,
            }
        };
        if triggered {
            info!(private = is_private, "AI trigger matched: {text}");
        }
        triggered
    }

    /// Strip quoted context, the group mention, and the trigger marker,
    /// leaving only the text the AI should see.
    pub fn clean_message(&self, text: &str, is_private: bool) -> String {
        let mut text = text
            .rsplit(CONTEXT_SEPARATOR)
            .next()
            .unwrap_or(text)
            .to_string();

        if is_private {
            if let Some(rule) = &self.private_rule {
                text = rule.replace(&text, "").into_owned();
            }
        } else {
            text = self.group_mention.replace(&text, "").into_owned();
            if let Some(rule) = &self.trigger_rule {
                text = rule.replace(&text, "").into_owned();
            }
        }
        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(bot_name: &str) -> TriggerClassifier {
        TriggerClassifier::new(bot_name, None, None).unwrap()
    }

    #[test]
    fn group_requires_leading_mention() {
        let t = open("Aria");
        assert!(t.should_trigger("@Aria hello", false));
        assert!(!t.should_trigger("@OtherBot hello", false));
        assert!(!t.should_trigger("Aria hello", false));
        assert!(!t.should_trigger("say @Aria hello", false));
    }

    #[test]
    fn bot_name_metacharacters_are_literal() {
        let t = open("R2.D2*");
        assert!(t.should_trigger("@R2.D2* hello", false));
        // `.` must not act as a wildcard, `*` must not quantify.
        assert!(!t.should_trigger("@R2xD2* hello", false));
        assert!(!t.should_trigger("@R2.D hello", false));
    }

    #[test]
    fn private_is_open_without_any_rule() {
        let t = open("Aria");
        assert!(t.should_trigger("hi", true));
    }

    #[test]
    fn private_keyword_gates_private_chats() {
        let t = TriggerClassifier::new("Aria", None, Some("hey aria")).unwrap();
        assert!(t.should_trigger("hey aria what's up", true));
        assert!(!t.should_trigger("what's up", true));
        // The keyword does not open group chats.
        assert!(!t.should_trigger("hey aria what's up", false));
    }

    #[test]
    fn trigger_rule_applies_to_mention_remainder() {
        let t = TriggerClassifier::new("Aria", Some("^ask"), None).unwrap();
        assert!(t.should_trigger("@Aria ask me anything", false));
        assert!(!t.should_trigger("@Aria tell me anything", false));
        assert!(t.should_trigger("ask me anything", true));
    }

    #[test]
    fn clean_strips_mention_in_groups() {
        let t = open("Aria");
        assert_eq!(t.clean_message("@Aria hello there", false), "hello there");
    }

    #[test]
    fn clean_strips_private_keyword() {
        let t = TriggerClassifier::new("Aria", None, Some("hey aria")).unwrap();
        assert_eq!(t.clean_message("hey aria open the door", true), "open the door");
    }

    #[test]
    fn clean_keeps_only_text_after_last_separator() {
        let t = open("Aria");
        let quoted = format!(
            "old reply{CONTEXT_SEPARATOR}older reply{CONTEXT_SEPARATOR}actual question"
        );
        assert_eq!(t.clean_message(&quoted, true), "actual question");
    }

    #[test]
    fn clean_without_separator_is_identity() {
        let t = open("Aria");
        assert_eq!(t.clean_message("hi", true), "hi");
    }
}
