//! Length-aware segmentation of rendered markup into send-ready chunks.
//!
//! Packs document lines greedily under the destination limit, joining
//! them with the paragraph separator. A single line that exceeds the
//! limit on its own falls back to whitespace-boundary splitting that is
//! tag-aware: a split never lands inside a `<...>` token, and any tag
//! still open at a forced boundary is closed there and reopened at the
//! start of the next chunk, so every chunk is self-contained.
//!
//! Lengths are counted in Unicode scalar values. The limit is caller
//! configuration, not a constant baked in here.

use bullhorn_types::SegmentError;
use tracing::warn;

use crate::block::RenderedDocument;

/// Split a rendered document into chunks of at most `limit` characters.
///
/// Returns one chunk per send call, in document order. An empty document
/// yields an empty vector -- callers skip content-free messages upstream.
///
/// # Errors
///
/// [`SegmentError::LimitTooSmall`] when `limit` cannot accommodate even a
/// single character plus the tag overhead of the span being split.
pub fn segment(doc: &RenderedDocument, limit: usize) -> Result<Vec<String>, SegmentError> {
    if limit == 0 {
        return Err(SegmentError::LimitTooSmall { limit });
    }

    let sep_width = char_len(RenderedDocument::SEPARATOR);
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for line in doc.lines() {
        let line_width = char_len(line);

        // Pathological long paragraph: close the current chunk and let
        // the tag-aware splitter take the whole line.
        if line_width > limit {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_width = 0;
            }
            chunks.extend(split_line(line, limit)?);
            continue;
        }

        if current.is_empty() {
            current.push_str(line);
            current_width = line_width;
        } else if current_width + sep_width + line_width <= limit {
            current.push_str(RenderedDocument::SEPARATOR);
            current.push_str(line);
            current_width += sep_width + line_width;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(line);
            current_width = line_width;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    Ok(chunks)
}

/// Remove every `<...>` tag token, leaving the visible (still
/// entity-escaped) text.
pub fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        match rest[lt..].find('>') {
            Some(rel) => rest = &rest[lt + rel + 1..],
            None => {
                // Unterminated bracket: not one of ours, keep it.
                out.push_str(&rest[lt..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

// ── Tag-aware line splitting ─────────────────────────────────────────────

/// One lexical token of a rendered line.
enum Token<'a> {
    /// An opening tag, e.g. `<b>` or `<a href="...">`.
    Open { raw: &'a str, name: &'a str },
    /// A closing tag, e.g. `</b>`.
    Close { raw: &'a str, name: &'a str },
    /// A literal text run (entity-escaped, contains no `<` or `>`).
    Text(&'a str),
}

/// Lex a rendered line into tag and text tokens.
///
/// The escaper guarantees literal text carries no raw angle brackets, so
/// every `<...>` span is one of our own tags. A stray `<` without a `>`
/// is treated as text rather than rejected.
fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = line;

    while let Some(lt) = rest.find('<') {
        if lt > 0 {
            tokens.push(Token::Text(&rest[..lt]));
        }
        match rest[lt..].find('>') {
            Some(rel) => {
                let raw = &rest[lt..=lt + rel];
                let inner = &raw[1..raw.len() - 1];
                if let Some(name) = inner.strip_prefix('/') {
                    tokens.push(Token::Close { raw, name });
                } else {
                    let name = inner.split_whitespace().next().unwrap_or(inner);
                    tokens.push(Token::Open { raw, name });
                }
                rest = &rest[lt + rel + 1..];
            }
            None => {
                tokens.push(Token::Text(&rest[lt..]));
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest));
    }
    tokens
}

/// A tag currently open while packing a chunk.
struct OpenTag {
    /// The full opening token, replayed at the start of the next chunk.
    raw: String,
    /// Tag name, used to build the matching closer.
    name: String,
}

impl OpenTag {
    /// Width of the matching `</name>` closer.
    fn close_width(&self) -> usize {
        char_len(&self.name) + 3
    }
}

/// Packing state for [`split_line`].
struct LinePacker {
    limit: usize,
    chunks: Vec<String>,
    current: String,
    current_width: usize,
    open: Vec<OpenTag>,
    /// Whether anything beyond the reopen prefix landed in `current`.
    progressed: bool,
}

impl LinePacker {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            chunks: Vec::new(),
            current: String::new(),
            current_width: 0,
            open: Vec::new(),
            progressed: false,
        }
    }

    /// Total width the closers for all open tags would occupy.
    fn close_width(&self) -> usize {
        self.open.iter().map(OpenTag::close_width).sum()
    }

    /// Characters still available in the current chunk, after reserving
    /// room to close every open tag.
    fn budget(&self) -> usize {
        self.limit
            .saturating_sub(self.current_width + self.close_width())
    }

    /// Close the current chunk: append closers for every open tag, emit
    /// the chunk, and start the next one by reopening the same tags.
    fn flush(&mut self) -> Result<(), SegmentError> {
        for tag in self.open.iter().rev() {
            self.current.push_str(&format!("</{}>", tag.name));
        }
        self.chunks.push(std::mem::take(&mut self.current));

        let mut reopened_width = 0;
        for tag in &self.open {
            self.current.push_str(&tag.raw);
            reopened_width += char_len(&tag.raw);
        }
        self.current_width = reopened_width;
        self.progressed = false;

        // A fresh chunk must still leave room for at least one character.
        if self.current_width + self.close_width() >= self.limit {
            return Err(SegmentError::LimitTooSmall { limit: self.limit });
        }
        Ok(())
    }

    fn push_open(&mut self, raw: &str, name: &str) -> Result<(), SegmentError> {
        let tag = OpenTag {
            raw: raw.to_owned(),
            name: name.to_owned(),
        };
        let needed = char_len(raw) + tag.close_width();

        if self.current_width + self.close_width() + needed > self.limit {
            if !self.progressed {
                return Err(SegmentError::LimitTooSmall { limit: self.limit });
            }
            self.flush()?;
            if self.current_width + self.close_width() + needed > self.limit {
                return Err(SegmentError::LimitTooSmall { limit: self.limit });
            }
        }

        self.current.push_str(raw);
        self.current_width += char_len(raw);
        self.open.push(tag);
        self.progressed = true;
        Ok(())
    }

    fn push_close(&mut self, raw: &str, name: &str) -> Result<(), SegmentError> {
        if self.open.last().is_some_and(|tag| tag.name == name) {
            // The closer's width was reserved when the tag opened.
            self.open.pop();
            self.current.push_str(raw);
            self.current_width += char_len(raw);
            return Ok(());
        }

        // A closer with no matching opener is a rendering defect; keep
        // the span readable by emitting the token as-is.
        warn!(tag = name, "unmatched closing tag in rendered line");
        let width = char_len(raw);
        if self.current_width + self.close_width() + width > self.limit {
            if !self.progressed {
                return Err(SegmentError::LimitTooSmall { limit: self.limit });
            }
            self.flush()?;
            if self.current_width + self.close_width() + width > self.limit {
                return Err(SegmentError::LimitTooSmall { limit: self.limit });
            }
        }
        self.current.push_str(raw);
        self.current_width += width;
        self.progressed = true;
        Ok(())
    }

    fn push_text(&mut self, text: &str) -> Result<(), SegmentError> {
        let mut rest = text;

        loop {
            // Leading whitespace on a fresh chunk is boundary whitespace;
            // trimming it is allowed and keeps chunks tidy.
            if !self.progressed {
                rest = rest.trim_start();
            }
            if rest.is_empty() {
                return Ok(());
            }

            let budget = self.budget();
            if char_len(rest) <= budget {
                self.current.push_str(rest);
                self.current_width += char_len(rest);
                self.progressed = true;
                return Ok(());
            }

            // The run does not fit; find a whitespace boundary at or
            // before the budget.
            let chars: Vec<(usize, char)> = rest.char_indices().collect();
            let take = budget.min(chars.len());
            let end_byte = if take == chars.len() {
                rest.len()
            } else {
                chars[take].0
            };
            let prefix = &rest[..end_byte];

            let split_byte = if take < chars.len() && chars[take].1.is_whitespace() {
                Some(end_byte)
            } else {
                prefix
                    .rfind(|c: char| c.is_whitespace())
                    .filter(|&idx| idx > 0)
            };

            match split_byte {
                Some(at) if self.progressed || !rest[..at].trim_end().is_empty() => {
                    let left = rest[..at].trim_end();
                    self.current.push_str(left);
                    self.current_width += char_len(left);
                    self.flush()?;
                    rest = rest[at..].trim_start();
                }
                _ => {
                    if self.progressed {
                        // Retry against a fresh chunk's larger budget.
                        self.flush()?;
                        continue;
                    }
                    if budget == 0 {
                        return Err(SegmentError::LimitTooSmall { limit: self.limit });
                    }
                    // No whitespace anywhere near: hard cut between
                    // characters (never inside a tag -- this is a text
                    // token).
                    self.current.push_str(prefix);
                    self.current_width += char_len(prefix);
                    self.flush()?;
                    rest = &rest[end_byte..];
                }
            }
        }
    }

    fn finish(mut self) -> Result<Vec<String>, SegmentError> {
        // The renderer emits tag-balanced lines, so the stack is empty
        // here unless the line was defective; close leftovers anyway so
        // the final chunk stays self-contained.
        for tag in self.open.drain(..).rev() {
            warn!(tag = %tag.name, "closing tag left open at end of line");
            self.current.push_str(&format!("</{}>", tag.name));
        }
        if !self.current.is_empty() {
            self.chunks.push(self.current);
        }
        Ok(self.chunks)
    }
}

/// Split one oversized line into tag-balanced chunks of at most `limit`
/// characters each.
fn split_line(line: &str, limit: usize) -> Result<Vec<String>, SegmentError> {
    let mut packer = LinePacker::new(limit);

    for token in tokenize(line) {
        match token {
            Token::Open { raw, name } => packer.push_open(raw, name)?,
            Token::Close { raw, name } => packer.push_close(raw, name)?,
            Token::Text(text) => packer.push_text(text)?,
        }
    }

    packer.finish()
}
