/// Why a handshake was turned down. Every variant maps to exactly one
/// response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeError {
    WrongMethod,
    MissingConnectionToken,
    MissingUpgradeToken,
    UnsupportedVersion,
    UnexpectedExtensionsHeader,
    MissingKey,
    OriginForbidden,
}

impl HandshakeError {
    pub fn status(&self) -> u16 {
        match self {
            HandshakeError::WrongMethod => 405,
            HandshakeError::MissingConnectionToken => 400,
            HandshakeError::MissingUpgradeToken => 400,
            HandshakeError::UnsupportedVersion => 400,
            HandshakeError::UnexpectedExtensionsHeader => 500,
            HandshakeError::MissingKey => 400,
            HandshakeError::OriginForbidden => 403,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            HandshakeError::WrongMethod => {
                "websocket: the client is not using the websocket protocol: request method is not GET"
            }
            HandshakeError::MissingConnectionToken => {
                "websocket: the client is not using the websocket protocol: 'upgrade' token not found in 'Connection' header"
            }
            HandshakeError::MissingUpgradeToken => {
                "websocket: the client is not using the websocket protocol: 'websocket' token not found in 'Upgrade' header"
            }
            HandshakeError::UnsupportedVersion => {
                "websocket: unsupported version: 13 not found in 'Sec-Websocket-Version' header"
            }
            HandshakeError::UnexpectedExtensionsHeader => {
                "websocket: application specific 'Sec-WebSocket-Extensions' headers are unsupported"
            }
            HandshakeError::MissingKey => {
                "websocket: not a websocket handshake: 'Sec-WebSocket-Key' header is missing or blank"
            }
            HandshakeError::OriginForbidden => {
                "websocket: request origin not allowed by the origin checker"
            }
        }
    }
}

impl std::fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for HandshakeError {}
