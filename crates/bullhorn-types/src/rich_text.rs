//! The structured rich-text message tree.
//!
//! [`RichTextNode`] is the closed tagged union that ingestion hands to the
//! rendering pipeline. Exhaustive matching at render time replaces the
//! duck-typed field probing of the source platform's raw block format;
//! anything the mapper does not recognize becomes [`RichTextNode::Unknown`]
//! and degrades to plain text rather than failing the message.

use serde::{Deserialize, Serialize};

/// Inline emphasis attributes active on a single text run.
///
/// Multiple flags may be active simultaneously. The renderer honors all
/// of them, wrapping tag pairs in a fixed nesting order regardless of how
/// the flags were set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleFlags {
    /// Bold (`<b>`).
    #[serde(default)]
    pub bold: bool,

    /// Italic (`<i>`).
    #[serde(default)]
    pub italic: bool,

    /// Strikethrough (`<s>`).
    #[serde(default)]
    pub strike: bool,

    /// Inline code (`<code>`, always the innermost wrapper).
    #[serde(default)]
    pub code: bool,
}

impl StyleFlags {
    /// True when no flag is set.
    pub fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.strike || self.code)
    }
}

/// One node of the rich-text tree.
///
/// Children ordering is the only meaningful order; the renderer never
/// reorders. A [`List`](RichTextNode::List) node's `depth` equals its
/// parent list depth + 1 (0 at the root).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RichTextNode {
    /// A literal text run with optional styling.
    Text {
        /// The literal content (unescaped).
        content: String,
        /// Active style flags.
        #[serde(default)]
        style: StyleFlags,
    },

    /// A hyperlink.
    Link {
        /// Target URL, stored raw; attribute-escaped at render time.
        url: String,
        /// Visible label. When empty, the URL itself is shown.
        #[serde(default)]
        label: String,
        /// Styling applied around the whole anchor.
        #[serde(default)]
        style: StyleFlags,
    },

    /// An emoji shortcode (e.g. `rocket`), resolved to unicode at render
    /// time where known.
    Emoji {
        /// Shortcode name without colons.
        name: String,
    },

    /// A user mention, rendered as `@id`.
    UserMention {
        /// Platform user identifier.
        id: String,
    },

    /// A channel mention, rendered as `#id`.
    ChannelMention {
        /// Platform channel identifier or display name.
        id: String,
    },

    /// A paragraph of inline children rendered onto one line.
    Section {
        /// Inline children, in document order.
        children: Vec<RichTextNode>,
    },

    /// An ordered or unordered list.
    List {
        /// Numbered (`1.`) when true, bulleted (`•`) otherwise.
        ordered: bool,
        /// Nesting depth, 0 at the root.
        #[serde(default)]
        depth: usize,
        /// List items, each rendered as its own line.
        items: Vec<RichTextNode>,
    },

    /// A block quote; each line gets a quote prefix.
    Quote {
        /// Inline children, in document order.
        children: Vec<RichTextNode>,
    },

    /// A preformatted code block (`<pre>`).
    Preformatted {
        /// Raw text, escaped but never styled.
        text: String,
    },

    /// A horizontal rule.
    Divider,

    /// A standalone heading, rendered bold.
    Header {
        /// Heading text.
        text: String,
    },

    /// A node kind the mapper did not recognize. Renders as its
    /// collected plain text with no styling.
    Unknown {
        /// Best-effort text extracted from the unrecognized node.
        #[serde(default)]
        text: String,
    },
}

impl RichTextNode {
    /// Plain text run with no styling.
    pub fn text(content: impl Into<String>) -> Self {
        RichTextNode::Text {
            content: content.into(),
            style: StyleFlags::default(),
        }
    }

    /// Text run with the given style flags.
    pub fn styled(content: impl Into<String>, style: StyleFlags) -> Self {
        RichTextNode::Text {
            content: content.into(),
            style,
        }
    }

    /// The visible (unstyled, unescaped) text of this node and its
    /// descendants, in document order.
    pub fn visible_text(&self) -> String {
        match self {
            RichTextNode::Text { content, .. } => content.clone(),
            RichTextNode::Link { url, label, .. } => {
                if label.is_empty() {
                    url.clone()
                } else {
                    label.clone()
                }
            }
            RichTextNode::Emoji { name } => format!(":{name}:"),
            RichTextNode::UserMention { id } => format!("@{id}"),
            RichTextNode::ChannelMention { id } => format!("#{id}"),
            RichTextNode::Section { children } | RichTextNode::Quote { children } => {
                children.iter().map(RichTextNode::visible_text).collect()
            }
            RichTextNode::List { items, .. } => items
                .iter()
                .map(RichTextNode::visible_text)
                .collect::<Vec<_>>()
                .join("\n"),
            RichTextNode::Preformatted { text } => text.clone(),
            RichTextNode::Divider => String::new(),
            RichTextNode::Header { text } => text.clone(),
            RichTextNode::Unknown { text } => text.clone(),
        }
    }
}

/// A qualifying source message as delivered by the ingestion collaborator.
///
/// Carries the structured tree plus the platform's plain-text fallback.
/// Processed once and discarded; nothing outlives a single message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignMessage {
    /// Root nodes of the rich-text tree, in document order.
    pub nodes: Vec<RichTextNode>,

    /// Plain-text fallback content from the source platform.
    #[serde(default)]
    pub fallback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_flags_default_is_plain() {
        assert!(StyleFlags::default().is_plain());
        assert!(!StyleFlags { bold: true, ..Default::default() }.is_plain());
    }

    #[test]
    fn deserialize_styled_text() {
        let json = r#"{
            "kind": "text",
            "content": "hello",
            "style": {"bold": true, "italic": true}
        }"#;
        let node: RichTextNode = serde_json::from_str(json).unwrap();
        match node {
            RichTextNode::Text { content, style } => {
                assert_eq!(content, "hello");
                assert!(style.bold);
                assert!(style.italic);
                assert!(!style.strike);
                assert!(!style.code);
            }
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn deserialize_text_without_style_defaults_plain() {
        let json = r#"{"kind": "text", "content": "plain"}"#;
        let node: RichTextNode = serde_json::from_str(json).unwrap();
        match node {
            RichTextNode::Text { style, .. } => assert!(style.is_plain()),
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn deserialize_nested_list() {
        let json = r#"{
            "kind": "list",
            "ordered": true,
            "depth": 0,
            "items": [
                {"kind": "section", "children": [{"kind": "text", "content": "first"}]},
                {"kind": "list", "ordered": false, "depth": 1, "items": []}
            ]
        }"#;
        let node: RichTextNode = serde_json::from_str(json).unwrap();
        match node {
            RichTextNode::List { ordered, depth, items } => {
                assert!(ordered);
                assert_eq!(depth, 0);
                assert_eq!(items.len(), 2);
                assert!(matches!(items[1], RichTextNode::List { depth: 1, .. }));
            }
            other => panic!("expected List, got {other:?}"),
        }
    }

    #[test]
    fn serde_roundtrip_divider_and_header() {
        let nodes = vec![
            RichTextNode::Divider,
            RichTextNode::Header { text: "Title".into() },
        ];
        let json = serde_json::to_string(&nodes).unwrap();
        let restored: Vec<RichTextNode> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, nodes);
    }

    #[test]
    fn visible_text_walks_in_order() {
        let tree = RichTextNode::Section {
            children: vec![
                RichTextNode::styled("hello", StyleFlags { bold: true, ..Default::default() }),
                RichTextNode::text(" world"),
            ],
        };
        assert_eq!(tree.visible_text(), "hello world");
    }

    #[test]
    fn visible_text_link_falls_back_to_url() {
        let link = RichTextNode::Link {
            url: "https://example.com".into(),
            label: String::new(),
            style: StyleFlags::default(),
        };
        assert_eq!(link.visible_text(), "https://example.com");
    }

    #[test]
    fn campaign_message_fallback_defaults_empty() {
        let json = r#"{"nodes": []}"#;
        let msg: CampaignMessage = serde_json::from_str(json).unwrap();
        assert!(msg.nodes.is_empty());
        assert!(msg.fallback.is_empty());
    }
}
