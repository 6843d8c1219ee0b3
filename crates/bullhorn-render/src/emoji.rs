//! Emoji shortcode resolution.
//!
//! The source platform transmits emoji as `:shortcode:` names. The small
//! set used by campaign messages maps to unicode here; unknown names are
//! rendered back as `:name:` so nothing is silently dropped.

/// Shortcode → unicode for the emoji that appear in campaign messages.
const EMOJI_MAP: &[(&str, &str)] = &[
    ("loudspeaker", "\u{1F4E2}"),
    ("mega", "\u{1F4E3}"),
    ("warning", "\u{26A0}\u{FE0F}"),
    ("rocket", "\u{1F680}"),
    ("white_check_mark", "\u{2705}"),
    ("x", "\u{274C}"),
    ("point_right", "\u{1F449}"),
    ("bulb", "\u{1F4A1}"),
    ("link", "\u{1F517}"),
    ("star", "\u{2B50}"),
    ("fire", "\u{1F525}"),
    ("tada", "\u{1F389}"),
    ("eyes", "\u{1F440}"),
    ("heavy_check_mark", "\u{2714}\u{FE0F}"),
];

/// Resolve a single shortcode name (without colons).
///
/// Returns `None` for unknown names.
pub fn lookup(name: &str) -> Option<&'static str> {
    EMOJI_MAP
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
}

/// Replace every `:name:` shortcode in `text` with its unicode
/// equivalent, leaving unknown shortcodes untouched.
///
/// Shortcode names are lowercase alphanumerics and underscores, matching
/// the source platform's naming.
pub fn replace_shortcodes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(':') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match after.find(':') {
            Some(end) if is_shortcode_name(&after[..end]) => {
                let name = &after[..end];
                match lookup(name) {
                    Some(unicode) => out.push_str(unicode),
                    None => {
                        out.push(':');
                        out.push_str(name);
                        out.push(':');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push(':');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_shortcode_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_names() {
        assert_eq!(lookup("rocket"), Some("\u{1F680}"));
        assert_eq!(lookup("tada"), Some("\u{1F389}"));
        assert_eq!(lookup("no_such_emoji"), None);
    }

    #[test]
    fn replaces_known_shortcodes() {
        assert_eq!(
            replace_shortcodes(":rocket: Launch day :tada:"),
            "\u{1F680} Launch day \u{1F389}"
        );
    }

    #[test]
    fn keeps_unknown_shortcodes() {
        assert_eq!(replace_shortcodes(":mystery: text"), ":mystery: text");
    }

    #[test]
    fn ignores_lone_colons() {
        assert_eq!(replace_shortcodes("time: 10:30"), "time: 10:30");
        assert_eq!(replace_shortcodes("a : b"), "a : b");
    }

    #[test]
    fn adjacent_shortcodes() {
        assert_eq!(
            replace_shortcodes(":fire::fire:"),
            "\u{1F525}\u{1F525}"
        );
    }

    #[test]
    fn empty_and_plain_text() {
        assert_eq!(replace_shortcodes(""), "");
        assert_eq!(replace_shortcodes("no emoji here"), "no emoji here");
    }

    #[test]
    fn uppercase_is_not_a_shortcode() {
        assert_eq!(replace_shortcodes(":ROCKET:"), ":ROCKET:");
    }
}
