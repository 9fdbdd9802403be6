//! Go literal quoting and unquoting

/// Quote `s` as an interpreted Go string literal
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if (c as u32) < 0x80 && c.is_control() => {
                out.push_str(&format!("\\x{:02x}", c as u32))
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Unquote a Go string, raw string or rune literal
///
/// Returns `None` when `s` is not a syntactically valid literal.
pub fn unquote(s: &str) -> Option<String> {
    let quote = s.chars().next()?;
    if !matches!(quote, '"' | '\'' | '`') || s.len() < 2 || !s.ends_with(quote) {
        return None;
    }
    let body = &s[1..s.len() - 1];

    match quote {
        '`' => (!body.contains('`')).then(|| body.replace('\r', "")),
        '"' => unescape(body, '"'),
        '\'' => {
            let value = unescape(body, '\'')?;
            (value.chars().count() == 1).then_some(value)
        }
        _ => None,
    }
}

fn unescape(body: &str, quote: char) -> Option<String> {
    let mut bytes = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c == quote || c == '\n' {
            return None;
        }
        if c != '\\' {
            let mut buf = [0; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        let escaped = chars.next()?;
        let simple = match escaped {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0C),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0B),
            '\\' => Some(b'\\'),
            c if c == quote => Some(c as u8),
            _ => None,
        };
        if let Some(byte) = simple {
            bytes.push(byte);
            continue;
        }

        match escaped {
            'x' => bytes.push(u8::from_str_radix(&take(&mut chars, 2)?, 16).ok()?),
            '0'..='7' => {
                let digits = format!("{}{}", escaped, take(&mut chars, 2)?);
                bytes.push(u8::from_str_radix(&digits, 8).ok()?);
            }
            'u' | 'U' => {
                let width = if escaped == 'u' { 4 } else { 8 };
                let code = u32::from_str_radix(&take(&mut chars, width)?, 16).ok()?;
                let mut buf = [0; 4];
                bytes.extend_from_slice(char::from_u32(code)?.encode_utf8(&mut buf).as_bytes());
            }
            _ => return None,
        }
    }

    String::from_utf8(bytes).ok()
}

fn take(chars: &mut std::str::Chars<'_>, n: usize) -> Option<String> {
    let taken: String = chars.by_ref().take(n).collect();
    (taken.chars().count() == n).then_some(taken)
}
