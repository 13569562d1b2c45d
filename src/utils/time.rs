pub type LocalTime = chrono::DateTime<chrono::Local>;
pub type UtcTime = chrono::DateTime<chrono::Utc>;

pub static DEFAULT_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S.%6f";
pub static DEFAULT_HTTP_HEADER_TIME_LAYOUT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[inline]
pub fn currentstr(layout: Option<&str>) -> String {
    match layout {
        None => now().format(DEFAULT_TIME_LAYOUT).to_string(),
        Some(layout) => now().format(layout).to_string(),
    }
}

#[inline]
pub fn now() -> LocalTime {
    chrono::Local::now()
}

#[inline]
pub fn utc() -> UtcTime {
    chrono::Utc::now()
}

#[inline]
pub fn http_header_time() -> String {
    utc().format(DEFAULT_HTTP_HEADER_TIME_LAYOUT).to_string()
}
