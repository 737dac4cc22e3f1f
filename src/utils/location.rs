// Byte-offset to line math and snippet shaping for regex matches.

/// Characters of context kept on each side of a match snippet.
const SNIPPET_CONTEXT: usize = 30;

/// Maximum length of a tally example before truncation.
const EXAMPLE_LEN: usize = 20;

/// 1-based line number of a byte offset, counting newlines before it.
pub fn line_number_at(content: &str, offset: usize) -> usize {
    let safe_offset = std::cmp::min(offset, content.len());
    content.as_bytes()[..safe_offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Bounded single-line context around a match: the matched text plus up to
/// 30 characters each side, `...` affixes where the window was clipped,
/// newlines flattened to spaces.
pub fn extract_snippet(content: &str, start: usize, end: usize) -> String {
    let from = floor_char_boundary(content, start.saturating_sub(SNIPPET_CONTEXT));
    let to = ceil_char_boundary(content, std::cmp::min(end + SNIPPET_CONTEXT, content.len()));

    let mut snippet = content[from..to].to_string();
    if from > 0 {
        snippet = format!("...{}", snippet);
    }
    if to < content.len() {
        snippet.push_str("...");
    }
    snippet.replace('\n', " ").trim().to_string()
}

/// Characters of code inspected on each side of an egress call site when
/// probing for sensitive-data keywords.
const EGRESS_WINDOW: usize = 100;

/// The raw text window around a match, clipped to char boundaries.
pub fn surrounding_window(content: &str, start: usize, end: usize) -> &str {
    let from = floor_char_boundary(content, start.saturating_sub(EGRESS_WINDOW));
    let to = ceil_char_boundary(content, std::cmp::min(end + EGRESS_WINDOW, content.len()));
    &content[from..to]
}

/// Truncate a matched string to 20 characters for tally examples.
pub fn truncate_example(text: &str) -> String {
    if text.len() > EXAMPLE_LEN {
        format!("{}...", &text[..floor_char_boundary(text, EXAMPLE_LEN)])
    } else {
        text.to_string()
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    index = std::cmp::min(index, s.len());
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
    index = std::cmp::min(index, s.len());
    while index < s.len() && !s.is_char_boundary(index) {
        index += 1;
    }
    index
}
