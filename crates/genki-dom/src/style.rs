//! Inline `style` attribute handling.
//!
//! Elements keep their inline style as a plain `style` attribute. These helpers
//! split it into ordered `(property, value)` declarations and write it back.

/// Parse an inline style string into ordered declarations.
///
/// Property names are lowercased. A later declaration of the same property
/// replaces the earlier one in place. Semicolons inside parentheses or quotes
/// do not split declarations.
pub(crate) fn parse_declarations(style: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let bytes = style.as_bytes();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;

    for (i, &ch) in bytes.iter().enumerate() {
        match (quote, ch) {
            (Some(q), _) if ch == q => quote = None,
            (Some(_), _) => {}
            (None, b'\'' | b'"') => quote = Some(ch),
            (None, b'(') => depth += 1,
            (None, b')') => depth = depth.saturating_sub(1),
            (None, b';') if depth == 0 => {
                push_declaration(&style[start..i], &mut out);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_declaration(&style[start..], &mut out);

    out
}

fn push_declaration(raw: &str, out: &mut Vec<(String, String)>) {
    let Some((name, value)) = raw.split_once(':') else {
        return;
    };
    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() {
        return;
    }
    let value = value.trim().to_string();

    if let Some(existing) = out.iter_mut().find(|(n, _)| *n == name) {
        existing.1 = value;
    } else {
        out.push((name, value));
    }
}

/// Serialize declarations back into an inline style string.
pub(crate) fn serialize_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Look up one property in an inline style string.
pub(crate) fn property(style: &str, name: &str) -> Option<String> {
    let name = name.to_ascii_lowercase();
    parse_declarations(style)
        .into_iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v)
}

/// Return `style` with `name` set to `value`. An empty value removes the property.
pub(crate) fn with_property(style: &str, name: &str, value: &str) -> String {
    let name = name.to_ascii_lowercase();
    let mut decls = parse_declarations(style);
    let value = value.trim();

    if value.is_empty() {
        decls.retain(|(n, _)| *n != name);
    } else if let Some(existing) = decls.iter_mut().find(|(n, _)| *n == name) {
        existing.1 = value.to_string();
    } else {
        decls.push((name, value.to_string()));
    }

    serialize_declarations(&decls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_declaration_without_semicolon() {
        let decls = parse_declarations("display: none");
        assert_eq!(decls, vec![("display".to_string(), "none".to_string())]);
    }

    #[test]
    fn test_parse_keeps_parenthesized_semicolons() {
        let decls = parse_declarations("background: url(a;b); Transform: rotate(180deg)");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].1, "url(a;b)");
        assert_eq!(decls[1].0, "transform");
    }

    #[test]
    fn test_later_declaration_wins() {
        assert_eq!(
            property("display: none; display: block", "display"),
            Some("block".to_string())
        );
    }

    #[test]
    fn test_with_property_replaces_and_removes() {
        let style = with_property("display: none", "display", "block");
        assert_eq!(style, "display: block;");

        let style = with_property(&style, "transform", "rotate(180deg)");
        assert_eq!(style, "display: block; transform: rotate(180deg);");

        let style = with_property(&style, "display", "");
        assert_eq!(style, "transform: rotate(180deg);");
    }

    #[test]
    fn test_malformed_declarations_are_skipped() {
        assert!(parse_declarations("garbage; : nothing;").is_empty());
    }
}
