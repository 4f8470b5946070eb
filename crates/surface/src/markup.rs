// Chunk: docs/chunks/surface_markup - Markup loader for rendered documents
//!
//! A small, lenient parser for the markup a document engine renders.
//!
//! It understands elements, text, comments and character references. It does
//! not know about attributes beyond skipping them, and closes any elements
//! still open at the end of input the way a browser would. Only structural
//! damage that leaves the tree ambiguous (an unterminated tag, a close tag
//! that matches nothing open, a numeric reference to a non-character) is an
//! error.

use thiserror::Error;

/// Elements that never have children.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "wbr"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("unterminated tag starting at byte {0}")]
    UnterminatedTag(usize),
    #[error("close tag </{tag}> at byte {at} does not match any open element")]
    MismatchedClose { tag: String, at: usize },
    #[error("invalid character reference &{0};")]
    BadEntity(String),
}

/// A parsed markup node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element {
        tag: String,
        children: Vec<MarkupNode>,
    },
    Text(String),
}

impl MarkupNode {
    pub fn element(tag: &str, children: Vec<MarkupNode>) -> Self {
        MarkupNode::Element {
            tag: tag.to_string(),
            children,
        }
    }

    pub fn text(text: &str) -> Self {
        MarkupNode::Text(text.to_string())
    }
}

/// Parses a markup fragment into a list of top-level nodes.
///
/// Adjacent text is merged into one text node; empty text is dropped.
pub fn parse(markup: &str) -> Result<Vec<MarkupNode>, MarkupError> {
    // Each frame is (tag, children collected so far). The bottom frame is the
    // fragment itself and has no tag.
    let mut stack: Vec<(Option<String>, Vec<MarkupNode>)> = vec![(None, Vec::new())];
    let mut text = String::new();
    let mut pos = 0;

    while pos < markup.len() {
        let rest = &markup[pos..];
        if !rest.starts_with('<') {
            let end = rest.find('<').unwrap_or(rest.len());
            decode_entities(&rest[..end], &mut text)?;
            pos += end;
            continue;
        }

        if rest.starts_with("<!--") {
            let close = rest.find("-->").ok_or(MarkupError::UnterminatedTag(pos))?;
            pos += close + 3;
            continue;
        }

        let close = find_tag_end(rest).ok_or(MarkupError::UnterminatedTag(pos))?;
        let inner = &rest[1..close];
        flush_text(&mut text, &mut stack);

        if let Some(name) = inner.strip_prefix('/') {
            let tag = name.trim().to_ascii_lowercase();
            let depth = stack
                .iter()
                .rposition(|(open, _)| open.as_deref() == Some(tag.as_str()))
                .ok_or(MarkupError::MismatchedClose {
                    tag: tag.clone(),
                    at: pos,
                })?;
            while stack.len() > depth {
                close_frame(&mut stack);
            }
        } else {
            let self_closing = inner.ends_with('/');
            let tag: String = inner
                .trim_end_matches('/')
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
                .to_ascii_lowercase();
            if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
                push_child(&mut stack, MarkupNode::Element { tag, children: Vec::new() });
            } else {
                stack.push((Some(tag), Vec::new()));
            }
        }
        pos += close + 1;
    }

    flush_text(&mut text, &mut stack);
    while stack.len() > 1 {
        close_frame(&mut stack);
    }
    Ok(stack.pop().map(|(_, nodes)| nodes).unwrap_or_default())
}

/// Escapes text for inclusion in markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Finds the `>` closing the tag at the start of `rest`, skipping quoted
/// attribute values.
fn find_tag_end(rest: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in rest.char_indices().skip(1) {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '>') => return Some(idx),
            (None, '<') => return None,
            _ => {}
        }
    }
    None
}

fn flush_text(text: &mut String, stack: &mut [(Option<String>, Vec<MarkupNode>)]) {
    if text.is_empty() {
        return;
    }
    if let Some((_, children)) = stack.last_mut() {
        match children.last_mut() {
            Some(MarkupNode::Text(existing)) => existing.push_str(text),
            _ => children.push(MarkupNode::Text(std::mem::take(text))),
        }
    }
    text.clear();
}

fn push_child(stack: &mut [(Option<String>, Vec<MarkupNode>)], node: MarkupNode) {
    if let Some((_, children)) = stack.last_mut() {
        children.push(node);
    }
}

fn close_frame(stack: &mut Vec<(Option<String>, Vec<MarkupNode>)>) {
    if let Some((Some(tag), children)) = stack.pop() {
        push_child(stack, MarkupNode::Element { tag, children });
    }
}

fn decode_entities(raw: &str, out: &mut String) -> Result<(), MarkupError> {
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .filter(|&i| i <= 10 && after[..i].chars().all(|c| c.is_ascii_alphanumeric() || c == '#'));
        let Some(semi) = semi else {
            out.push('&');
            rest = after;
            continue;
        };
        let name = &after[..semi];
        match decode_entity(name)? {
            Some(ch) => out.push(ch),
            // Unknown named references stay literal.
            None => {
                out.push('&');
                out.push_str(name);
                out.push(';');
            }
        }
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(())
}

fn decode_entity(name: &str) -> Result<Option<char>, MarkupError> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => num.parse::<u32>(),
        };
        return code
            .ok()
            .and_then(char::from_u32)
            .map(Some)
            .ok_or_else(|| MarkupError::BadEntity(name.to_string()));
    }
    Ok(match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => None,
    })
}
