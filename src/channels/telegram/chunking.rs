//! Text chunking for Telegram's message size limit
//!
//! Telegram caps a message at 4096 characters. OCR output of a long receipt
//! can exceed that, so replies are split on paragraph, line, then word
//! boundaries, falling back to a hard split on a char boundary.

/// Default chunk size limit (leaves margin from Telegram's 4096 hard cap)
pub const DEFAULT_LIMIT: usize = 4000;

/// Split `text` into chunks of at most `limit` characters.
///
/// When `limit` is 0, [`DEFAULT_LIMIT`] is used. Every returned chunk is
/// non-empty; empty input yields no chunks.
#[must_use]
pub fn chunk_text(text: &str, limit: usize) -> Vec<String> {
    let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };

    let mut chunks = Vec::new();
    let mut rest = text;

    loop {
        let Some((cut, _)) = rest.char_indices().nth(limit) else {
            break;
        };

        let window = &rest[..cut];
        let split = window
            .rfind("\n\n")
            .map(|i| i + 2)
            .or_else(|| window.rfind('\n').map(|i| i + 1))
            .or_else(|| window.rfind(' ').map(|i| i + 1))
            .filter(|&i| i > 0)
            .unwrap_or(cut);

        let chunk = rest[..split].trim_end();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        rest = rest[split..].trim_start_matches('\n');
    }

    let tail = rest.trim_end();
    if !tail.is_empty() {
        chunks.push(tail.to_string());
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunk_text("Total: $42", 0), vec!["Total: $42"]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(chunk_text("", 0).is_empty());
    }

    #[test]
    fn splits_on_paragraphs() {
        let text = "aaaa aaaa\n\nbbbb bbbb\n\ncccc";
        let chunks = chunk_text(text, 12);
        assert_eq!(chunks, vec!["aaaa aaaa", "bbbb bbbb", "cccc"]);
    }

    #[test]
    fn splits_on_lines_then_words() {
        let chunks = chunk_text("one two three\nfour", 10);
        assert_eq!(chunks, vec!["one two", "three\nfour"]);
    }

    #[test]
    fn hard_split_respects_char_boundaries() {
        let text = "é".repeat(25);
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn chunks_never_exceed_limit() {
        let text = "line of receipt text 12.50\n".repeat(400);
        let chunks = chunk_text(&text, 0);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| !c.is_empty() && c.chars().count() <= DEFAULT_LIMIT));
    }
}
