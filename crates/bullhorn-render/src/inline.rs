//! Inline span transformation: styled runs and links to tag-wrapped HTML.
//!
//! Literal content is escaped exactly once, then wrapped with the tag
//! pairs for every active style flag in a fixed nesting order:
//! `<code>` innermost (code spans suppress further styling on the source
//! platform), then `<b>`, `<i>`, and `<s>` outermost. The order is stable
//! regardless of how the flags were set.

use bullhorn_types::{RichTextNode, StyleFlags};

use crate::emoji;
use crate::escape::{escape_attr, escape_text};

/// Render a literal text run with its active style flags.
///
/// Content that escapes to an empty string produces an empty result --
/// no empty tag pairs are emitted.
pub fn render_span(content: &str, style: &StyleFlags) -> String {
    let escaped = escape_text(content);
    if escaped.is_empty() {
        return String::new();
    }
    wrap_styles(escaped, style)
}

/// Render a link with its label and surrounding style flags.
///
/// The label is escaped as text; the URL is attribute-escaped and kept
/// otherwise raw. An empty label falls back to showing the URL itself.
pub fn render_link(url: &str, label: &str, style: &StyleFlags) -> String {
    let visible = if label.is_empty() { url } else { label };
    let anchor = format!(
        "<a href=\"{}\">{}</a>",
        escape_attr(url),
        escape_text(visible)
    );
    // A code flag on a link is not expressible in the destination
    // dialect; it is dropped while bold/italic/strike still apply.
    let style = StyleFlags {
        code: false,
        ..*style
    };
    wrap_styles(anchor, &style)
}

/// Render one inline node to an escaped, tag-wrapped span.
///
/// Block-level nodes appearing in inline position degrade to their
/// visible text -- render best-effort, never fail.
pub fn render_inline(node: &RichTextNode) -> String {
    match node {
        RichTextNode::Text { content, style } => render_span(content, style),
        RichTextNode::Link { url, label, style } => render_link(url, label, style),
        RichTextNode::Emoji { name } => match emoji::lookup(name) {
            Some(unicode) => unicode.to_owned(),
            None => format!(":{name}:"),
        },
        RichTextNode::UserMention { id } => format!("@{}", escape_text(id)),
        RichTextNode::ChannelMention { id } => format!("#{}", escape_text(id)),
        RichTextNode::Unknown { text } => escape_text(text),
        other => escape_text(&other.visible_text()),
    }
}

/// Wrap pre-escaped content with tag pairs for each active flag.
///
/// Nesting order, innermost to outermost: code, bold, italic, strike.
fn wrap_styles(mut content: String, style: &StyleFlags) -> String {
    if style.code {
        content = format!("<code>{content}</code>");
    }
    if style.bold {
        content = format!("<b>{content}</b>");
    }
    if style.italic {
        content = format!("<i>{content}</i>");
    }
    if style.strike {
        content = format!("<s>{content}</s>");
    }
    content
}
