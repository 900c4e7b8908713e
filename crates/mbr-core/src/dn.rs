//! Distinguished-name parsing.
//!
//! Only what membership resolution needs: splitting a DN into its RDN
//! components on unescaped commas, and reading the attribute and value of a
//! component. Components keep their escape sequences so that joining them
//! with `,` reproduces the original name; values are unescaped on read.

/// Splits a DN into its RDN components.
///
/// A comma preceded by an unescaped backslash belongs to the component
/// value. Escape sequences are kept verbatim and surrounding whitespace is
/// trimmed. Empty input yields no components.
#[must_use]
pub fn split_dn(dn: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    // Length of `current` up to its last escaped character, which trimming
    // must not cut into.
    let mut protected = 0;
    let mut escape = false;

    for ch in dn.chars() {
        if escape {
            current.push(ch);
            protected = current.len();
            escape = false;
            continue;
        }
        match ch {
            '\\' => {
                current.push(ch);
                escape = true;
            }
            ',' => {
                parts.push(trim_component(&current, protected));
                current.clear();
                protected = 0;
            }
            _ => current.push(ch),
        }
    }

    let last = trim_component(&current, protected);
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts
}

fn trim_component(component: &str, protected: usize) -> String {
    let end = component.trim_end().len().max(protected);
    component[..end].trim_start().to_string()
}

/// Attribute of an RDN component (the text before the first unescaped `=`).
#[must_use]
pub fn rdn_attribute(component: &str) -> Option<&str> {
    split_at_equals(component).map(|(attribute, _)| attribute.trim())
}

/// Unescaped value of an RDN component.
///
/// A component without `=` is returned unescaped as a whole.
#[must_use]
pub fn rdn_value(component: &str) -> String {
    let raw = split_at_equals(component).map_or(component, |(_, value)| value);
    unescape(raw.trim_start())
}

/// Value of the leading RDN of a DN: `cn=Bar\, Foo,dc=example` gives `Bar, Foo`.
#[must_use]
pub fn extract_cn(dn: &str) -> String {
    split_dn(dn).first().map(|c| rdn_value(c)).unwrap_or_default()
}

/// The DN with its leading component removed. Escapes are preserved.
#[must_use]
pub fn parent_dn(dn: &str) -> String {
    split_dn(dn).get(1..).map(|rest| rest.join(",")).unwrap_or_default()
}

/// Case-folded form used to compare DNs for identity.
#[must_use]
pub fn normalize_dn(dn: &str) -> String {
    split_dn(dn)
        .iter()
        .map(|c| c.to_lowercase())
        .collect::<Vec<_>>()
        .join(",")
}

fn split_at_equals(component: &str) -> Option<(&str, &str)> {
    let mut escape = false;
    for (i, ch) in component.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' => escape = true,
            '=' => return Some((&component[..i], &component[i + 1..])),
            _ => {}
        }
    }
    None
}

fn unescape(value: &str) -> String {
    let mut bytes = Vec::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let Some(next) = chars.next() else {
            // Dangling backslash is kept literally.
            bytes.push(b'\\');
            break;
        };
        let hex = next
            .to_digit(16)
            .zip(chars.peek().and_then(|c| c.to_digit(16)));
        match hex {
            Some((hi, lo)) => {
                chars.next();
                // Two hex digits always fit a byte.
                bytes.push((hi * 16 + lo) as u8);
            }
            None => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(next.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}
