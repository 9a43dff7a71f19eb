//! Small node helpers shared by the shape classifier and the extractor.

use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, unescape_with};
use tree_sitter::Node;

/// Get the source text covered by a node
pub fn get_node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    let start = node.start_byte();
    let end = node.end_byte();
    let slice = source.get(start..end).unwrap_or(&[]);
    match std::str::from_utf8(slice) {
        Ok(text) => text.trim_end_matches(|ch| ch == '\n' || ch == '\r'),
        Err(_) => "",
    }
}

/// Named children of a node, with comments filtered out.
pub fn named_children_no_comments<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !is_comment(*child))
        .collect()
}

/// First named child that is not a comment.
pub fn first_named_child<'a>(node: Node<'a>) -> Option<Node<'a>> {
    named_children_no_comments(node).into_iter().next()
}

pub fn is_comment(node: Node) -> bool {
    node.kind() == "comment" || node.kind() == "html_comment"
}

/// The value of a plain string literal node (`"x"` or `'x'`).
///
/// Built from the node's parts: JS escape sequences and JSX character
/// references are decoded. Template strings are not literals here.
pub fn string_literal_value(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut value = String::new();
    let mut cursor = node.walk();
    for part in node.named_children(&mut cursor) {
        let text = part.utf8_text(source).ok()?;
        match part.kind() {
            "escape_sequence" => decode_js_escape(text, &mut value),
            "html_character_reference" => value.push_str(&decode_character_reference(text)),
            _ => value.push_str(text),
        }
    }
    Some(value)
}

/// Append the character a JS escape sequence (`\n`, `\x41`, `\u{1F600}`, ...) stands for.
fn decode_js_escape(raw: &str, out: &mut String) {
    let Some(body) = raw.strip_prefix('\\') else {
        out.push_str(raw);
        return;
    };
    let decoded = match body {
        "n" => Some('\n'),
        "r" => Some('\r'),
        "t" => Some('\t'),
        "b" => Some('\u{8}'),
        "f" => Some('\u{c}'),
        "v" => Some('\u{b}'),
        "0" => Some('\0'),
        _ if body.starts_with(['\n', '\r', '\u{2028}', '\u{2029}']) => return,
        _ => {
            let hex = body
                .strip_prefix("u{")
                .and_then(|rest| rest.strip_suffix('}'))
                .or_else(|| body.strip_prefix('u'))
                .or_else(|| body.strip_prefix('x'));
            match hex {
                Some(digits) => u32::from_str_radix(digits, 16).ok().and_then(char::from_u32),
                None => body.chars().next(),
            }
        }
    };
    match decoded {
        Some(ch) => out.push(ch),
        None => out.push_str(raw),
    }
}

/// Decode a JSX character reference (`&amp;`, `&#47;`, `&#x2F;`); unknown names stay as written.
fn decode_character_reference(raw: &str) -> Cow<'_, str> {
    unescape_with(raw, resolve_html5_entity).unwrap_or(Cow::Borrowed(raw))
}

/// Last segment of a possibly dotted name (`Models.AppPage` -> `AppPage`).
pub fn last_name_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name).trim()
}
