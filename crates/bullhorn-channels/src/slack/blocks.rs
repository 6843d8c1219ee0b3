//! Block Kit to rich-text tree mapping.
//!
//! Slack delivers structured message content as a Block Kit `blocks`
//! array whose `rich_text` elements nest freely-shaped JSON objects.
//! [`blocks_to_nodes`] walks that structure once and produces the closed
//! [`RichTextNode`] tree; anything unrecognized degrades to
//! [`RichTextNode::Unknown`] with its collected text instead of failing
//! the message.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use bullhorn_types::rich_text::{RichTextNode, StyleFlags};

use super::mrkdwn;

/// One entry of a message's `blocks` array.
///
/// Only the fields the mapper inspects are modeled; `rich_text` inner
/// elements stay as raw JSON until [`blocks_to_nodes`] parses them.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackBlock {
    /// Block type: `"rich_text"`, `"section"`, `"header"`, `"divider"`, ...
    #[serde(rename = "type")]
    pub block_type: String,

    /// Text object, for `section` and `header` blocks.
    pub text: Option<SlackTextObject>,

    /// Inner elements, for `rich_text` blocks.
    #[serde(default)]
    pub elements: Vec<Value>,
}

/// A Block Kit text object (`plain_text` or `mrkdwn`).
#[derive(Debug, Clone, Deserialize)]
pub struct SlackTextObject {
    /// `"plain_text"` or `"mrkdwn"`.
    #[serde(rename = "type")]
    pub text_type: String,

    /// The text content.
    pub text: String,
}

/// A `rich_text` sub-element: section, list, quote, or preformatted.
#[derive(Debug, Clone, Deserialize)]
struct RichTextPart {
    #[serde(rename = "type")]
    part_type: String,

    #[serde(default)]
    elements: Vec<Value>,

    /// List style: `"ordered"` or `"bullet"` (lists only).
    style: Option<String>,

    /// List nesting depth, 0 at the root (lists only).
    indent: Option<usize>,
}

/// Inline style flags on a leaf element.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct SlackStyle {
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    strike: bool,
    #[serde(default)]
    code: bool,
}

impl From<SlackStyle> for StyleFlags {
    fn from(s: SlackStyle) -> Self {
        StyleFlags {
            bold: s.bold,
            italic: s.italic,
            strike: s.strike,
            code: s.code,
        }
    }
}

/// A leaf element inside a `rich_text` section, quote, or preformatted.
#[derive(Debug, Clone, Deserialize)]
struct RichTextLeaf {
    #[serde(rename = "type")]
    element_type: String,

    text: Option<String>,
    url: Option<String>,
    name: Option<String>,
    user_id: Option<String>,
    channel_id: Option<String>,
    range: Option<String>,

    #[serde(default)]
    style: SlackStyle,
}

/// Map a message's Block Kit blocks onto the rich-text tree.
///
/// Returns the root nodes in document order. `context` blocks (footers,
/// timestamps) are dropped; unrecognized blocks keep their text as
/// [`RichTextNode::Unknown`].
pub fn blocks_to_nodes(blocks: &[SlackBlock]) -> Vec<RichTextNode> {
    let mut nodes = Vec::new();

    for block in blocks {
        match block.block_type.as_str() {
            "header" => {
                if let Some(ref text) = block.text {
                    nodes.push(RichTextNode::Header {
                        text: text.text.clone(),
                    });
                }
            }
            "divider" => nodes.push(RichTextNode::Divider),
            "section" => {
                if let Some(ref text) = block.text {
                    if text.text_type == "mrkdwn" {
                        nodes.extend(mrkdwn::parse(&text.text));
                    } else {
                        nodes.push(RichTextNode::Section {
                            children: vec![RichTextNode::text(text.text.clone())],
                        });
                    }
                }
            }
            "rich_text" => {
                for element in &block.elements {
                    if let Some(node) = map_part(element) {
                        nodes.push(node);
                    }
                }
            }
            "context" => {
                debug!("dropping context block");
            }
            other => {
                debug!(block_type = %other, "unrecognized block type");
                let text = block.text.as_ref().map(|t| t.text.clone()).unwrap_or_default();
                if !text.is_empty() {
                    nodes.push(RichTextNode::Unknown { text });
                }
            }
        }
    }

    nodes
}

/// Map one `rich_text` sub-element onto a block-level node.
fn map_part(value: &Value) -> Option<RichTextNode> {
    let part: RichTextPart = match serde_json::from_value(value.clone()) {
        Ok(part) => part,
        Err(err) => {
            debug!(error = %err, "unparseable rich_text element");
            return None;
        }
    };

    match part.part_type.as_str() {
        "rich_text_section" => Some(RichTextNode::Section {
            children: map_leaves(&part.elements),
        }),
        "rich_text_list" => {
            // List items arrive as rich_text_section objects.
            let items: Vec<RichTextNode> =
                part.elements.iter().filter_map(map_part).collect();
            Some(RichTextNode::List {
                ordered: part.style.as_deref() == Some("ordered"),
                depth: part.indent.unwrap_or(0),
                items,
            })
        }
        "rich_text_quote" => Some(RichTextNode::Quote {
            children: map_leaves(&part.elements),
        }),
        "rich_text_preformatted" => {
            let text: String = map_leaves(&part.elements)
                .iter()
                .map(RichTextNode::visible_text)
                .collect();
            Some(RichTextNode::Preformatted { text })
        }
        other => {
            debug!(part_type = %other, "unrecognized rich_text part");
            let text: String = map_leaves(&part.elements)
                .iter()
                .map(RichTextNode::visible_text)
                .collect();
            (!text.is_empty()).then_some(RichTextNode::Unknown { text })
        }
    }
}

/// Map leaf elements onto inline nodes, dropping anything unparseable.
fn map_leaves(elements: &[Value]) -> Vec<RichTextNode> {
    elements.iter().filter_map(map_leaf).collect()
}

/// Map one leaf element onto an inline node.
fn map_leaf(value: &Value) -> Option<RichTextNode> {
    let leaf: RichTextLeaf = match serde_json::from_value(value.clone()) {
        Ok(leaf) => leaf,
        Err(err) => {
            debug!(error = %err, "unparseable leaf element");
            return None;
        }
    };

    match leaf.element_type.as_str() {
        "text" => Some(RichTextNode::styled(leaf.text?, leaf.style.into())),
        "link" => Some(RichTextNode::Link {
            url: leaf.url?,
            label: leaf.text.unwrap_or_default(),
            style: leaf.style.into(),
        }),
        "emoji" => Some(RichTextNode::Emoji { name: leaf.name? }),
        "user" => Some(RichTextNode::UserMention { id: leaf.user_id? }),
        "channel" => Some(RichTextNode::ChannelMention { id: leaf.channel_id? }),
        "broadcast" => Some(RichTextNode::text(format!("@{}", leaf.range?))),
        other => {
            debug!(element_type = %other, "unrecognized leaf element");
            let text = leaf.text.unwrap_or_default();
            (!text.is_empty()).then_some(RichTextNode::Unknown { text })
        }
    }
}
