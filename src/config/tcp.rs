use serde::Deserialize;

use super::{duration_in_millis::DurationInMillis, size_in_bytes::SizeInBytes};

#[derive(Deserialize, Clone, Default, Debug)]
pub struct TcpConfig {
    #[serde(default, alias = "ReadBufSize")]
    pub read_buf_size: SizeInBytes,

    #[serde(default, alias = "WriteBufSize")]
    pub write_buf_size: SizeInBytes,

    #[serde(default, alias = "IdleTimeout")]
    pub idle_timeout: DurationInMillis,
}

impl TcpConfig {
    pub fn autofix(&mut self) -> Option<String> {
        self.read_buf_size.less_then(4096, 8 * 1024);
        self.write_buf_size.less_then(4096, 8 * 1024);
        self.idle_timeout.less_then(1000, 30 * 1000);
        None
    }
}
