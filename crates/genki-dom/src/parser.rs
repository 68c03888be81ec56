//! HTML fragment parser.
//!
//! Handles the subset of HTML that widget templates produce: start and end
//! tags, quoted, unquoted and bare attributes, void and self-closing elements,
//! comments, doctypes and basic character references. Mismatched end tags
//! close back to the nearest open element with that tag; an end tag with no
//! open match is ignored. A `<` that cannot start a tag is kept as text.

use crate::error::{DomError, DomResult};
use crate::logging::targets;
use crate::node::{Dom, NodeId, VOID_TAGS};

/// Parse a fragment into a fresh [`Dom`], below its root.
///
/// # Example
///
/// ```
/// use genki_dom::parse_fragment;
///
/// let dom = parse_fragment(r#"<ul id="menu"><li value="a">Alpha</li></ul>"#).unwrap();
/// let menu = dom.element_by_id("menu").unwrap();
/// assert_eq!(dom.text_content(menu), "Alpha");
/// ```
pub fn parse_fragment(html: &str) -> DomResult<Dom> {
    let mut dom = Dom::new();
    let root = dom.root();
    parse_into(&mut dom, root, html)?;
    Ok(dom)
}

/// Parse `html`, appending the nodes below `parent`.
pub(crate) fn parse_into(dom: &mut Dom, parent: NodeId, html: &str) -> DomResult<()> {
    let bytes = html.as_bytes();
    let mut stack = vec![parent];
    let mut i = 0;

    while i < bytes.len() {
        if !opens_markup(bytes, i) {
            let start = i;
            i += 1;
            while i < bytes.len() && !opens_markup(bytes, i) {
                i += 1;
            }
            let current = current_parent(&stack, i)?;
            let text = dom.create_text(decode_entities(&html[start..i]));
            dom.append_child(current, text)?;
            continue;
        }

        if html[i..].starts_with("<!--") {
            let end = html[i + 4..]
                .find("-->")
                .ok_or_else(|| DomError::parse("unclosed comment", i))?;
            i += 4 + end + 3;
            continue;
        }

        if html[i..].starts_with("<!") {
            let end = html[i..]
                .find('>')
                .ok_or_else(|| DomError::parse("unclosed declaration", i))?;
            i += end + 1;
            continue;
        }

        if html[i..].starts_with("</") {
            let (tag, next) = parse_end_tag(html, i)?;
            i = next;
            close_element(dom, &mut stack, &tag);
            continue;
        }

        let start = parse_start_tag(html, i)?;
        i = start.next;

        let element = dom.create_element(&start.tag);
        for (name, value) in start.attributes {
            dom.set_attribute(element, &name, value)?;
        }
        dom.append_child(current_parent(&stack, i)?, element)?;

        if !start.self_closing && !VOID_TAGS.contains(&start.tag.as_str()) {
            stack.push(element);
        }
    }

    if stack.len() > 1 {
        tracing::trace!(
            target: targets::PARSER,
            open_elements = stack.len() - 1,
            "fragment ended with open elements, closing implicitly"
        );
    }

    Ok(())
}

/// A `<` starts markup only when followed by a tag name, `!` or `/`.
/// Anything else, like the `<` in `1 < 2`, is text.
fn opens_markup(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'<'
        && bytes
            .get(i + 1)
            .is_some_and(|&b| b.is_ascii_alphabetic() || b == b'!' || b == b'/')
}

fn current_parent(stack: &[NodeId], offset: usize) -> DomResult<NodeId> {
    stack
        .last()
        .copied()
        .ok_or_else(|| DomError::parse("invalid parser stack", offset))
}

fn close_element(dom: &Dom, stack: &mut Vec<NodeId>, tag: &str) {
    // stack[0] is the insertion parent and is never closed
    let Some(pos) = stack
        .iter()
        .skip(1)
        .rposition(|&node| dom.tag_name(node) == Some(tag))
    else {
        tracing::trace!(target: targets::PARSER, tag, "ignoring unmatched end tag");
        return;
    };
    stack.truncate(pos + 1);
}

struct StartTag {
    tag: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
    next: usize,
}

fn parse_start_tag(html: &str, at: usize) -> DomResult<StartTag> {
    let bytes = html.as_bytes();
    let mut i = at + 1;

    let tag_start = i;
    while i < bytes.len() && is_name_char(bytes[i]) {
        i += 1;
    }
    let tag = html[tag_start..i].to_ascii_lowercase();
    if tag.is_empty() {
        return Err(DomError::parse("empty tag name", at));
    }

    let mut attributes: Vec<(String, String)> = Vec::new();
    let self_closing;

    loop {
        skip_whitespace(bytes, &mut i);
        match bytes.get(i) {
            None => return Err(DomError::parse("unclosed start tag", at)),
            Some(b'>') => {
                i += 1;
                self_closing = false;
                break;
            }
            Some(b'/') if bytes.get(i + 1) == Some(&b'>') => {
                i += 2;
                self_closing = true;
                break;
            }
            Some(_) => {}
        }

        let name_start = i;
        while i < bytes.len() && is_attribute_name_char(bytes[i]) {
            i += 1;
        }
        let name = html[name_start..i].to_ascii_lowercase();
        if name.is_empty() {
            return Err(DomError::parse("invalid attribute name", i));
        }

        skip_whitespace(bytes, &mut i);
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            skip_whitespace(bytes, &mut i);
            parse_attribute_value(html, &mut i)?
        } else {
            String::new()
        };

        // first occurrence wins, as in browsers
        if !attributes.iter().any(|(n, _)| *n == name) {
            attributes.push((name, value));
        }
    }

    Ok(StartTag {
        tag,
        attributes,
        self_closing,
        next: i,
    })
}

fn parse_end_tag(html: &str, at: usize) -> DomResult<(String, usize)> {
    let bytes = html.as_bytes();
    let mut i = at + 2;
    skip_whitespace(bytes, &mut i);

    let tag_start = i;
    while i < bytes.len() && is_name_char(bytes[i]) {
        i += 1;
    }
    let tag = html[tag_start..i].to_ascii_lowercase();

    while i < bytes.len() && bytes[i] != b'>' {
        i += 1;
    }
    if i >= bytes.len() {
        return Err(DomError::parse("unclosed end tag", at));
    }
    Ok((tag, i + 1))
}

fn parse_attribute_value(html: &str, i: &mut usize) -> DomResult<String> {
    let bytes = html.as_bytes();
    match bytes.get(*i) {
        None => Err(DomError::parse("missing attribute value", *i)),
        Some(&quote) if quote == b'"' || quote == b'\'' => {
            let start = *i + 1;
            let len = html[start..]
                .bytes()
                .position(|b| b == quote)
                .ok_or_else(|| DomError::parse("unclosed quoted attribute value", *i))?;
            *i = start + len + 1;
            Ok(decode_entities(&html[start..start + len]))
        }
        Some(_) => {
            let start = *i;
            while *i < bytes.len()
                && !bytes[*i].is_ascii_whitespace()
                && bytes[*i] != b'>'
                && !(bytes[*i] == b'/' && bytes.get(*i + 1) == Some(&b'>'))
            {
                *i += 1;
            }
            Ok(decode_entities(&html[start..*i]))
        }
    }
}

fn skip_whitespace(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':'
}

fn is_attribute_name_char(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'' | b'<')
}

/// Decode the named and numeric character references templates use.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            decode_entity(entity).map(|ch| (ch, semi + 1))
        });
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
