use thiserror::Error;

use crate::schema::MagpieConfig;

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("chat.bot_name must not be empty")]
    EmptyBotName,

    #[error("invalid regex in {field}: {message}")]
    InvalidRegex { field: &'static str, message: String },

    #[error("provider.temperature {0} outside [0, 2]")]
    TemperatureOutOfRange(f32),

    #[error("resolver.leaderboard_limit must be at least 1")]
    ZeroLeaderboardLimit,
}

/// Fail fast on configuration that would otherwise surface as a broken
/// dispatcher at the first message: uncompilable trigger rules, a
/// nonsensical sampling temperature, an empty mention name.
pub fn validate(cfg: &MagpieConfig) -> Result<(), ValidateError> {
    if cfg.chat.bot_name.trim().is_empty() {
        return Err(ValidateError::EmptyBotName);
    }

    if let Some(rule) = &cfg.chat.trigger_rule
        && let Err(e) = regex::Regex::new(rule)
    {
        return Err(ValidateError::InvalidRegex {
            field: "chat.trigger_rule",
            message: e.to_string(),
        });
    }

    if !(0.0..=2.0).contains(&cfg.provider.temperature) {
        return Err(ValidateError::TemperatureOutOfRange(cfg.provider.temperature));
    }

    if cfg.resolver.leaderboard_limit == 0 {
        return Err(ValidateError::ZeroLeaderboardLimit);
    }

    Ok(())
}
