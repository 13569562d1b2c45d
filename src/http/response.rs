use crate::http::headers::Headers;
use crate::http::message::Message;

pub fn status_text(code: u16) -> &'static str {
    match code {
        101 => "Switching Protocols",
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        426 => "Upgrade Required",
        500 => "Internal Server Error",
        _ => "Unknown Status Code",
    }
}

pub struct Response {
    pub(crate) msg: Message,
}

impl Response {
    pub fn new() -> Self {
        Self {
            msg: Message::default(),
        }
    }

    pub fn set_code(&mut self, code: u16) -> &mut Self {
        self.msg.f1.clear();
        self.msg.f1.push_str(code.to_string().as_str());
        self.msg.f2.clear();
        self.msg.f2.push_str(status_text(code));
        self
    }

    pub fn code(&self) -> u16 {
        self.msg.f1.parse().unwrap_or(0)
    }

    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.msg.headers
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.msg.headers
    }

    #[inline]
    pub fn write(&mut self, buf: &[u8]) -> &mut Self {
        self.msg.body.write_bytes(buf);
        self
    }

    #[inline]
    pub fn body(&self) -> &[u8] {
        self.msg.body.as_bytes()
    }

    /// Drops everything staged so far, headers and body included.
    pub fn reset(&mut self) {
        self.msg.clear();
    }

    pub fn clear(&mut self) {
        self.msg.clear();
    }

    pub(crate) fn autofix(&mut self) {
        if self.msg.f0.is_empty() {
            self.msg.f0.push_str("HTTP/1.1");
        }
        if self.msg.f1.is_empty() {
            self.msg.f1.push_str("200");
        }
        if self.msg.f2.is_empty() {
            self.msg.f2.push_str(status_text(self.code()));
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
