//! Token budgeting for history eviction.
//!
//! The estimate is deliberately crude: one token per character of content.
//! It only has to be monotonic in history size so the FIFO eviction loop
//! terminates; it is not used for provider-side accounting.

use magpie_common::ChatRecord;

/// Maximum estimated tokens a conversation history may hold before the
/// oldest non-system messages are evicted.
pub const HISTORY_TOKEN_BUDGET: usize = 2000;

/// Estimate the token cost of a full history.
pub fn estimate_tokens(history: &[ChatRecord]) -> usize {
    history.iter().map(|r| r.content.chars().count()).sum()
}

/// True when `history` no longer fits the budget.
pub fn over_budget(history: &[ChatRecord]) -> bool {
    estimate_tokens(history) > HISTORY_TOKEN_BUDGET
}
