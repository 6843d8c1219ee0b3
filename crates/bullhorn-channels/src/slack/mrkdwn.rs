//! Fallback parser for the mrkdwn text field.
//!
//! Messages without Block Kit blocks (and `section` blocks of type
//! `mrkdwn`) carry the source platform's lightweight markup: `*bold*`,
//! `_italic_`, `~strike~`, `` `code` ``, triple-backtick fences,
//! `<url|label>` links, `<@U...>` mentions, `:shortcode:` emoji, and
//! `&gt;`-prefixed quote lines. [`parse`] converts that markup into the
//! same [`RichTextNode`] tree the Block Kit mapper produces, so the rest
//! of the pipeline never knows which path a message took.
//!
//! The text arrives with `&`, `<`, `>` entity-escaped; literal `<` marks
//! a platform construct. Entities in plain runs are decoded here because
//! the renderer escapes all content exactly once itself.

use bullhorn_types::rich_text::{RichTextNode, StyleFlags};

/// Parse mrkdwn text into block-level rich-text nodes.
pub fn parse(text: &str) -> Vec<RichTextNode> {
    let mut nodes = Vec::new();

    // Triple-backtick fences alternate regular and preformatted
    // segments. An unterminated fence still yields a code block.
    for (index, segment) in text.split("```").enumerate() {
        if index % 2 == 1 {
            let code = unescape(segment.trim_matches('\n'));
            if !code.is_empty() {
                nodes.push(RichTextNode::Preformatted { text: code });
            }
        } else {
            parse_segment(segment, &mut nodes);
        }
    }

    nodes
}

/// Parse a regular (non-fenced) segment into sections and quotes.
fn parse_segment(segment: &str, nodes: &mut Vec<RichTextNode>) {
    for paragraph in segment.split("\n\n") {
        if paragraph.trim().is_empty() {
            continue;
        }

        // Group consecutive quote lines and plain lines separately so
        // a paragraph can interleave both.
        let mut quote_lines: Vec<&str> = Vec::new();
        let mut text_lines: Vec<&str> = Vec::new();

        for line in paragraph.lines() {
            if let Some(stripped) = quote_content(line) {
                flush_text(&mut text_lines, nodes);
                quote_lines.push(stripped);
            } else {
                flush_quote(&mut quote_lines, nodes);
                text_lines.push(line);
            }
        }
        flush_text(&mut text_lines, nodes);
        flush_quote(&mut quote_lines, nodes);
    }
}

/// Drain buffered plain lines into one [`RichTextNode::Section`].
fn flush_text(lines: &mut Vec<&str>, nodes: &mut Vec<RichTextNode>) {
    if lines.is_empty() {
        return;
    }
    let joined = lines.join("\n");
    lines.clear();
    if joined.trim().is_empty() {
        return;
    }
    nodes.push(RichTextNode::Section {
        children: scan_inline(&joined),
    });
}

/// Drain buffered quote lines into one [`RichTextNode::Quote`].
fn flush_quote(lines: &mut Vec<&str>, nodes: &mut Vec<RichTextNode>) {
    if lines.is_empty() {
        return;
    }
    let joined = lines.join("\n");
    lines.clear();
    if joined.trim().is_empty() {
        return;
    }
    nodes.push(RichTextNode::Quote {
        children: scan_inline(&joined),
    });
}

/// Return the content of a quote line, or `None` for a regular line.
///
/// The quote marker survives entity escaping, so both `>` and `&gt;`
/// forms appear in the wild.
fn quote_content(line: &str) -> Option<&str> {
    for marker in ["&gt;", ">"] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    None
}

/// Scan one run of text for inline constructs.
fn scan_inline(text: &str) -> Vec<RichTextNode> {
    let chars: Vec<char> = text.chars().collect();
    let mut nodes = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '<' => {
                if let Some(end) = find_char(&chars, i + 1, '>') {
                    let inner: String = chars[i + 1..end].iter().collect();
                    if !inner.is_empty() {
                        flush_plain(&mut plain, &mut nodes);
                        nodes.push(angle_construct(&inner));
                        i = end + 1;
                        continue;
                    }
                }
                plain.push('<');
                i += 1;
            }
            marker @ ('*' | '_' | '~' | '`') => {
                if let Some(end) = find_marker_close(&chars, i + 1, marker) {
                    let content: String = chars[i + 1..end].iter().collect();
                    flush_plain(&mut plain, &mut nodes);
                    nodes.push(RichTextNode::styled(
                        unescape(&content),
                        style_for(marker),
                    ));
                    i = end + 1;
                    continue;
                }
                plain.push(marker);
                i += 1;
            }
            ':' => {
                if let Some(end) = find_shortcode_close(&chars, i + 1) {
                    let name: String = chars[i + 1..end].iter().collect();
                    flush_plain(&mut plain, &mut nodes);
                    nodes.push(RichTextNode::Emoji { name });
                    i = end + 1;
                    continue;
                }
                plain.push(':');
                i += 1;
            }
            c => {
                plain.push(c);
                i += 1;
            }
        }
    }

    flush_plain(&mut plain, &mut nodes);
    nodes
}

/// Push buffered plain text as an unstyled run, decoding entities.
fn flush_plain(plain: &mut String, nodes: &mut Vec<RichTextNode>) {
    if plain.is_empty() {
        return;
    }
    nodes.push(RichTextNode::text(unescape(plain)));
    plain.clear();
}

/// Map an angle-bracket construct's inner content to a node.
///
/// `<@U...>` is a user mention, `<#C...|name>` a channel mention,
/// `<!here>` a broadcast, anything else a `<url|label>` link.
fn angle_construct(inner: &str) -> RichTextNode {
    if let Some(id) = inner.strip_prefix('@') {
        return RichTextNode::UserMention { id: id.to_owned() };
    }
    if let Some(rest) = inner.strip_prefix('#') {
        let (id, label) = split_pipe(rest);
        let name = if label.is_empty() { id } else { label };
        return RichTextNode::ChannelMention { id: name.to_owned() };
    }
    if let Some(rest) = inner.strip_prefix('!') {
        let (range, _) = split_pipe(rest);
        return RichTextNode::text(format!("@{range}"));
    }
    let (url, label) = split_pipe(inner);
    RichTextNode::Link {
        url: unescape(url),
        label: unescape(label),
        style: StyleFlags::default(),
    }
}

/// Split `a|b` into `(a, b)`; missing pipe gives an empty second part.
fn split_pipe(text: &str) -> (&str, &str) {
    match text.split_once('|') {
        Some((a, b)) => (a, b),
        None => (text, ""),
    }
}

/// The style a single marker character toggles.
fn style_for(marker: char) -> StyleFlags {
    StyleFlags {
        bold: marker == '*',
        italic: marker == '_',
        strike: marker == '~',
        code: marker == '`',
    }
}

/// Find the next occurrence of `target` at or after `start`.
fn find_char(chars: &[char], start: usize, target: char) -> Option<usize> {
    (start..chars.len()).find(|&j| chars[j] == target)
}

/// Find the closing marker for an emphasis span opened at `start - 1`.
///
/// The span must be non-empty and stay on one line.
fn find_marker_close(chars: &[char], start: usize, marker: char) -> Option<usize> {
    for j in start..chars.len() {
        if chars[j] == '\n' {
            return None;
        }
        if chars[j] == marker {
            return (j > start).then_some(j);
        }
    }
    None
}

/// Find the closing colon of an emoji shortcode opened at `start - 1`.
fn find_shortcode_close(chars: &[char], start: usize) -> Option<usize> {
    for j in start..chars.len() {
        let c = chars[j];
        if c == ':' {
            return (j > start).then_some(j);
        }
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' || c == '+') {
            return None;
        }
    }
    None
}

/// Decode the entity escaping the source platform applies to raw text.
///
/// `&amp;` must be decoded last so `&amp;lt;` yields the literal `&lt;`.
fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
