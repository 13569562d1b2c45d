use serde::Deserialize;

use super::{duration_in_millis::DurationInMillis, size_in_bytes::SizeInBytes};

#[derive(Deserialize, Clone, Default, Debug)]
pub struct WebSocketConfig {
    #[serde(default, alias = "ReadBufSize")]
    pub read_buf_size: SizeInBytes,

    #[serde(default, alias = "WriteBufSize")]
    pub write_buf_size: SizeInBytes,

    #[serde(default, alias = "compression", alias = "Compression", alias = "EnableCompression")]
    pub enable_compression: bool,

    #[serde(default, alias = "Subprotocols")]
    pub subprotocols: Vec<String>,

    /// zero disables the deadline
    #[serde(default, alias = "HandshakeTimeout")]
    pub handshake_timeout: DurationInMillis,
}

impl WebSocketConfig {
    pub fn autofix(&mut self) -> Option<String> {
        self.read_buf_size.less_then(256, 4096);
        self.write_buf_size.less_then(256, 4096);
        None
    }
}
