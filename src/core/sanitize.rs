// src/core/sanitize.rs

/// Decode the entities a server-rendered table actually uses:
/// the common named ones plus decimal/hex character references.
/// Anything unrecognised is left as written.
pub fn normalize_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').filter(|&semi| semi <= 10) {
            Some(semi) => match decode_entity(&tail[1..semi]) {
                Some(ch) => {
                    out.push(ch);
                    rest = &tail[semi + 1..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            },
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "nbsp" => Some(' '),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Collapse whitespace runs to one space and trim the ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(normalize_entities("A&amp;B&nbsp;C"), "A&B C");
        assert_eq!(normalize_entities("&#65;&#x42;"), "AB");
        assert_eq!(normalize_entities("&lt;90&gt;"), "<90>");
    }

    #[test]
    fn leaves_stray_ampersands() {
        assert_eq!(normalize_entities("R&D"), "R&D");
        assert_eq!(normalize_entities("a & b;"), "a & b;");
        assert_eq!(normalize_entities("&bogus;"), "&bogus;");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize_ws("  高等\n\t数学  A "), "高等 数学 A");
    }
}
