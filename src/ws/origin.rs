use crate::http::Request;

/// The default origin policy: allow requests without an `Origin` header,
/// otherwise the origin's host must equal the request host.
pub(crate) fn same_origin(req: &Request) -> bool {
    let origin = match req.headers().get("origin") {
        None => return true,
        Some(v) => v,
    };
    if origin.is_empty() {
        return true;
    }

    let parsed = match url::Url::parse(origin.as_str()) {
        Ok(v) => v,
        Err(_) => return false,
    };
    let origin_host = match parsed.host_str() {
        None => return false,
        Some(host) => match parsed.port() {
            None => host.to_string(),
            Some(port) => format!("{}:{}", host, port),
        },
    };

    match req.host() {
        None => false,
        Some(host) => origin_host.eq_ignore_ascii_case(host.as_str()),
    }
}
