use crate::http::Headers;

/// True when any comma-separated element of the named header equals `token`,
/// ignoring ascii case and surrounding whitespace.
pub(crate) fn contains(headers: &Headers, name: &str, token: &str) -> bool {
    match headers.get_all(name) {
        None => false,
        Some(values) => values.iter().any(|value| {
            value
                .split(',')
                .any(|part| part.trim().eq_ignore_ascii_case(token))
        }),
    }
}

/// The comma-separated elements of the named header, in wire order, trimmed,
/// empties dropped. Parameters after `;` stay attached to their element.
pub(crate) fn values(headers: &Headers, name: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(values) = headers.get_all(name) {
        for value in values {
            for part in value.split(',') {
                let part = part.trim();
                if !part.is_empty() {
                    out.push(part.to_string());
                }
            }
        }
    }
    out
}
