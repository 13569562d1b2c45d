mod conn;
mod deflate;
mod error;
mod key;
mod origin;
pub mod pool;
mod token;
mod upgrader;

pub use conn::Conn;
pub use deflate::{CompressWriter, DeflateWriter};
pub use error::HandshakeError;
pub use pool::{BufferPool, PooledWriteBuffer, WriteBufferPool};
pub use upgrader::{is_websocket_upgrade, OriginChecker, RejectHandler, Upgrader};
