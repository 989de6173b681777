/// Characters that pass through RFC 5987 `attr-char` unencoded.
fn is_attr_char(b: u8) -> bool {
    matches!(
        b,
        b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~'
    )
}

/// Percent-encode every byte outside the RFC 5987 `attr-char` set.
///
/// `keep` lists extra bytes to leave as-is, e.g. `/` when encoding a URL path.
pub fn percent_encode(value: &str, keep: &[u8]) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        if is_attr_char(b) || keep.contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// Build a safe `Content-Disposition: attachment` header value.
///
/// The quoted `filename` is an ASCII fallback with quotes, backslashes,
/// semicolons and control characters removed; `filename*` carries the exact
/// name.
pub fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| (c.is_ascii_graphic() || *c == ' ') && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_safe = ascii_safe.trim();
    let ascii_name = if ascii_safe.is_empty() {
        "download"
    } else {
        ascii_safe
    };

    let encoded = percent_encode(filename, &[]);
    format!("attachment; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}
