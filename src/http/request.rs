use crate::http::headers::Headers;
use crate::http::message::Message;

pub struct Request {
    pub(crate) msg: Message,
}

impl Request {
    pub fn new() -> Self {
        Self {
            msg: Message::default(),
        }
    }

    #[inline]
    pub fn method(&self) -> &str {
        &self.msg.f0
    }

    #[inline]
    pub fn rawuri(&self) -> &str {
        &self.msg.f1
    }

    #[inline]
    pub fn version(&self) -> &str {
        &self.msg.f2
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
    pub fn host(&self) -> Option<&String> {
        self.msg.headers.get("host")
    }

    #[inline]
    pub fn body(&self) -> &[u8] {
        self.msg.body.as_bytes()
    }

    pub fn clear(&mut self) {
        self.msg.clear();
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}
