//! `/cmd` slash-command parsing.
//!
//! Unknown command names and missing arguments are deliberately silent:
//! the command is parsed to [`Command::Unknown`] and the dispatcher does
//! nothing. No error ever reaches the chat.

/// Prefix (including the trailing space) that marks a command message.
pub const COMMAND_PREFIX: &str = "/cmd ";

/// Static usage text for `/cmd help`.
pub const HELP_TEXT: &str = "========\n\
    /cmd help\n\
    # show this usage text\n\
    /cmd prompt <PROMPT>\n\
    # set the system prompt for this conversation\n\
    /cmd clear\n\
    # reset this conversation's history\n\
    /img <PROMPT>\n\
    # generate an image from a prompt\n\
    ========";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Prompt(String),
    Clear,
    Unknown,
}

/// Parse a message body into a command. `None` when the body does not
/// carry the command prefix at all.
pub fn parse(body: &str) -> Option<Command> {
    let rest = body.strip_prefix(COMMAND_PREFIX)?;
    let mut words = rest.split_whitespace();
    let command = match words.next() {
        Some("help") => Command::Help,
        Some("prompt") => {
            let prompt = words.collect::<Vec<_>>().join(" ");
            if prompt.is_empty() {
                Command::Unknown
            } else {
                Command::Prompt(prompt)
            }
        },
        Some("clear") => Command::Clear,
        _ => Command::Unknown,
    };
    Some(command)
}
