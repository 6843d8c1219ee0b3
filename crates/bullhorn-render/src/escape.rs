//! Reserved-character escaping for Telegram's HTML subset.
//!
//! Telegram parses `<`, `>`, and `&` as markup, so literal text must be
//! escaped *before* tag wrapping -- escaping afterwards would corrupt the
//! inserted tags. Escaping is not idempotent (already-escaped text
//! double-escapes), so callers escape exactly once per literal run.

/// Escape characters reserved by Telegram's HTML tag syntax.
///
/// Replaces `&`, `<`, `>` and nothing else. Suitable for text content;
/// use [`escape_attr`] for attribute values.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a value for use inside a double-quoted attribute.
///
/// Like [`escape_text`] but additionally escapes `"` so a URL cannot
/// terminate the `href` attribute early.
pub fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
