//! Outbound reply shaping: block-word screening, chunking, and the group
//! reply envelope.

/// Transport limit for a single outbound message, in characters.
pub const MAX_CHUNK_CHARS: usize = 500;

/// Split `text` into order-preserving chunks of at most `max_chars`
/// characters. Always yields at least one chunk.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    chunks.push(current);
    chunks
}

/// True when any configured block word occurs in `text`. An empty list
/// blocks nothing.
pub fn contains_blocked(text: &str, block_words: &[String]) -> bool {
    block_words.iter().any(|word| text.contains(word.as_str()))
}

/// Group replies echo the question back at the sender above a divider.
pub fn format_group_reply(sender: &str, original: &str, answer: &str) -> String {
    format!("@{sender} {original}\n\n------\n {answer}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_chunks("hello", 500), vec!["hello"]);
    }

    #[test]
    fn twelve_hundred_chars_make_three_ordered_chunks() {
        let text: String = ('a'..='z').cycle().take(1200).collect();
        let chunks = split_chunks(&text, 500);
        assert_eq!(
            chunks.iter().map(|c| c.chars().count()).collect::<Vec<_>>(),
            vec![500, 500, 200]
        );
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn exact_limit_is_one_chunk() {
        let text = "x".repeat(500);
        assert_eq!(split_chunks(&text, 500), vec![text]);
    }

    #[test]
    fn chunking_counts_chars_not_bytes() {
        let text = "蓝".repeat(501);
        let chunks = split_chunks(&text, 500);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 500);
        assert_eq!(chunks[1], "蓝");
    }

    #[test]
    fn empty_block_list_blocks_nothing() {
        assert!(!contains_blocked("anything at all", &[]));
    }

    #[test]
    fn block_word_matches_by_containment() {
        let blocked = vec!["badword".to_string()];
        assert!(contains_blocked("this has a badword inside", &blocked));
        assert!(!contains_blocked("this is fine", &blocked));
    }

    #[test]
    fn group_reply_envelope() {
        let formatted = format_group_reply("alice", "what is rust", "a language");
        assert_eq!(formatted, "@alice what is rust\n\n------\n a language");
    }
}
