use serde::Deserialize;

use super::size_in_bytes::SizeInBytes;

#[derive(Deserialize, Clone, Default, Debug)]
pub struct HttpConfig {
    #[serde(default, alias = "MaxHeaderLineSize")]
    pub max_header_line_size: SizeInBytes,

    #[serde(default, alias = "MaxHeadersCount")]
    pub max_headers_count: u32,

    #[serde(default, alias = "MaxBodySize")]
    pub max_body_size: SizeInBytes,
}

impl HttpConfig {
    pub fn autofix(&mut self) -> Option<String> {
        self.max_header_line_size.less_then(1024, 6 * 1024);
        if self.max_headers_count == 0 {
            self.max_headers_count = 128;
        }
        self.max_body_size.less_then(4096, 10 * 1024 * 1024);
        None
    }
}
