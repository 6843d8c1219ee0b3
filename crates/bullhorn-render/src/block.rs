//! Block-tree rendering: [`RichTextNode`] trees to a [`RenderedDocument`].
//!
//! The walk is recursive and purely functional: ordered-list counters are
//! local values threaded through each list's own call, restarting at every
//! list entry, so rendering is reentrant and safe across threads. No
//! length policy here -- that belongs to [`segment`](crate::segment).

use bullhorn_types::RichTextNode;

use crate::emoji;
use crate::escape::escape_text;
use crate::inline::render_inline;

/// Spaces of indentation per list nesting level.
const LIST_INDENT: &str = "    ";

/// Bullet marker for unordered list items.
const BULLET: &str = "\u{2022}";

/// Prefix for each quoted line.
const QUOTE_MARK: &str = "\u{275D}";

/// Width of the divider rule, in characters.
const DIVIDER_WIDTH: usize = 20;

/// The fully rendered message: an ordered sequence of escaped,
/// tag-wrapped line-strings.
///
/// Joining the lines with the paragraph separator yields the complete
/// markup string. Immutable after creation; consumed only by the
/// segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    lines: Vec<String>,
}

impl RenderedDocument {
    /// The paragraph separator between lines.
    pub const SEPARATOR: &'static str = "\n\n";

    /// Build a document from already-rendered lines.
    ///
    /// Lines must be escaped and tag-balanced; [`render`] is the normal
    /// way to obtain a document.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// The rendered lines, in document order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True when nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The full markup string: lines joined with [`Self::SEPARATOR`].
    pub fn to_markup(&self) -> String {
        self.lines.join(Self::SEPARATOR)
    }
}

/// Render a rich-text tree into a [`RenderedDocument`].
pub fn render(nodes: &[RichTextNode]) -> RenderedDocument {
    let mut lines = Vec::new();
    for node in nodes {
        render_block(node, &mut lines);
    }
    RenderedDocument { lines }
}

/// Render one block-level node, appending its lines to `lines`.
fn render_block(node: &RichTextNode, lines: &mut Vec<String>) {
    match node {
        RichTextNode::Section { children } => {
            let rendered = inline_run(children);
            if !rendered.is_empty() {
                lines.push(rendered);
            }
        }

        RichTextNode::List {
            ordered,
            depth,
            items,
        } => render_list(*ordered, *depth, items, lines),

        RichTextNode::Quote { children } => {
            let inner = inline_run(children);
            if !inner.is_empty() {
                let quoted = inner
                    .split('\n')
                    .map(|line| format!("{QUOTE_MARK} {line}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                lines.push(quoted);
            }
        }

        RichTextNode::Preformatted { text } => {
            lines.push(format!("<pre>{}</pre>", escape_text(text)));
        }

        RichTextNode::Divider => {
            lines.push("\u{2500}".repeat(DIVIDER_WIDTH));
        }

        RichTextNode::Header { text } => {
            let resolved = emoji::replace_shortcodes(text);
            let trimmed = resolved.trim();
            if !trimmed.is_empty() {
                lines.push(format!("<b>{}</b>", escape_text(trimmed)));
            }
        }

        RichTextNode::Unknown { text } => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                lines.push(escape_text(trimmed));
            }
        }

        // An inline node at block level becomes its own line.
        inline => {
            let rendered = render_inline(inline);
            let trimmed = rendered.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_owned());
            }
        }
    }
}

/// Render a list, one line per item.
///
/// The counter is a local value so ordered numbering restarts at each
/// list entry; nested lists recurse with their own counter and do not
/// consume a number from the enclosing list.
fn render_list(ordered: bool, depth: usize, items: &[RichTextNode], lines: &mut Vec<String>) {
    let indent = LIST_INDENT.repeat(depth);
    let mut counter = 1usize;

    for item in items {
        if let RichTextNode::List {
            ordered: nested_ordered,
            depth: nested_depth,
            items: nested_items,
        } = item
        {
            render_list(*nested_ordered, *nested_depth, nested_items, lines);
            continue;
        }

        let content = item_content(item);
        if ordered {
            lines.push(format!("{indent}{counter}. {content}"));
            counter += 1;
        } else {
            lines.push(format!("{indent}{BULLET} {content}"));
        }
    }
}

/// Flatten a list item to its inline content.
fn item_content(item: &RichTextNode) -> String {
    match item {
        RichTextNode::Section { children } => inline_run(children),
        other => render_inline(other).trim().to_owned(),
    }
}

/// Concatenate inline children onto one run, trimming the trailing
/// padding the source platform appends to each line.
fn inline_run(children: &[RichTextNode]) -> String {
    let raw: String = children.iter().map(render_inline).collect();
    let cleaned = raw
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    cleaned.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use bullhorn_types::StyleFlags;

    use super::*;

    fn bold() -> StyleFlags {
        StyleFlags {
            bold: true,
            ..Default::default()
        }
    }

    fn section(children: Vec<RichTextNode>) -> RichTextNode {
        RichTextNode::Section { children }
    }

    #[test]
    fn styled_section_renders_one_line() {
        let doc = render(&[section(vec![
            RichTextNode::styled("hello", bold()),
            RichTextNode::text(" world"),
        ])]);
        assert_eq!(doc.lines(), ["<b>hello</b> world"]);
    }

    #[test]
    fn sections_become_separate_lines() {
        let doc = render(&[
            section(vec![RichTextNode::text("first paragraph")]),
            section(vec![RichTextNode::text("second paragraph")]),
        ]);
        assert_eq!(doc.lines().len(), 2);
        assert_eq!(doc.to_markup(), "first paragraph\n\nsecond paragraph");
    }

    #[test]
    fn empty_section_emits_nothing() {
        let doc = render(&[section(vec![RichTextNode::text("   ")])]);
        assert!(doc.is_empty());
        assert_eq!(doc.to_markup(), "");
    }

    #[test]
    fn ordered_list_numbering() {
        let doc = render(&[RichTextNode::List {
            ordered: true,
            depth: 0,
            items: vec![
                section(vec![RichTextNode::text("first")]),
                section(vec![RichTextNode::text("second")]),
            ],
        }]);
        assert_eq!(doc.lines(), ["1. first", "2. second"]);
    }

    #[test]
    fn unordered_list_bullets() {
        let doc = render(&[RichTextNode::List {
            ordered: false,
            depth: 0,
            items: vec![
                section(vec![RichTextNode::text("one")]),
                section(vec![RichTextNode::text("two")]),
            ],
        }]);
        assert_eq!(doc.lines(), ["\u{2022} one", "\u{2022} two"]);
    }

    #[test]
    fn nested_list_indents_and_restarts_counter() {
        let doc = render(&[RichTextNode::List {
            ordered: true,
            depth: 0,
            items: vec![
                section(vec![RichTextNode::text("outer one")]),
                RichTextNode::List {
                    ordered: true,
                    depth: 1,
                    items: vec![
                        section(vec![RichTextNode::text("inner one")]),
                        section(vec![RichTextNode::text("inner two")]),
                    ],
                },
                section(vec![RichTextNode::text("outer two")]),
            ],
        }]);
        assert_eq!(
            doc.lines(),
            [
                "1. outer one",
                "    1. inner one",
                "    2. inner two",
                "2. outer two",
            ]
        );
    }

    #[test]
    fn sibling_lists_restart_numbering() {
        let doc = render(&[
            RichTextNode::List {
                ordered: true,
                depth: 0,
                items: vec![section(vec![RichTextNode::text("a")])],
            },
            RichTextNode::List {
                ordered: true,
                depth: 0,
                items: vec![section(vec![RichTextNode::text("b")])],
            },
        ]);
        assert_eq!(doc.lines(), ["1. a", "1. b"]);
    }

    #[test]
    fn divider_renders_rule() {
        let doc = render(&[RichTextNode::Divider]);
        assert_eq!(doc.lines(), ["\u{2500}".repeat(20)]);
    }

    #[test]
    fn header_renders_bold_with_emoji() {
        let doc = render(&[RichTextNode::Header {
            text: ":rocket: Launch".into(),
        }]);
        assert_eq!(doc.lines(), ["<b>\u{1F680} Launch</b>"]);
    }

    #[test]
    fn header_escapes_reserved_chars() {
        let doc = render(&[RichTextNode::Header {
            text: "a < b".into(),
        }]);
        assert_eq!(doc.lines(), ["<b>a &lt; b</b>"]);
    }

    #[test]
    fn quote_prefixes_each_line() {
        let doc = render(&[RichTextNode::Quote {
            children: vec![RichTextNode::text("line one\nline two")],
        }]);
        assert_eq!(doc.lines(), ["\u{275D} line one\n\u{275D} line two"]);
    }

    #[test]
    fn preformatted_escapes_and_wraps() {
        let doc = render(&[RichTextNode::Preformatted {
            text: "if a < b {}".into(),
        }]);
        assert_eq!(doc.lines(), ["<pre>if a &lt; b {}</pre>"]);
    }

    #[test]
    fn unknown_node_degrades_to_text() {
        let doc = render(&[RichTextNode::Unknown {
            text: "mystery <content>".into(),
        }]);
        assert_eq!(doc.lines(), ["mystery &lt;content&gt;"]);
    }

    #[test]
    fn inline_node_at_block_level() {
        let doc = render(&[RichTextNode::Link {
            url: "https://e.test".into(),
            label: "go".into(),
            style: StyleFlags::default(),
        }]);
        assert_eq!(doc.lines(), ["<a href=\"https://e.test\">go</a>"]);
    }

    #[test]
    fn trailing_padding_is_trimmed_per_line() {
        // The source platform pads line ends with space elements.
        let doc = render(&[section(vec![
            RichTextNode::text("padded   \nnext"),
        ])]);
        assert_eq!(doc.lines(), ["padded\nnext"]);
    }

    #[test]
    fn stripping_tags_recovers_visible_text() {
        let tree = vec![
            RichTextNode::Header { text: "Title".into() },
            section(vec![
                RichTextNode::styled("bold", bold()),
                RichTextNode::text(" and plain"),
            ]),
            RichTextNode::List {
                ordered: true,
                depth: 0,
                items: vec![section(vec![RichTextNode::text("item")])],
            },
        ];
        let doc = render(&tree);
        let stripped = crate::segment::strip_tags(&doc.to_markup());
        assert!(stripped.contains("Title"));
        assert!(stripped.contains("bold and plain"));
        assert!(stripped.contains("1. item"));
        assert!(!stripped.contains('<'));
    }
}
