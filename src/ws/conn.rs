use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::http::Transport;
use crate::ws::deflate::{
    compress_no_context_takeover, decompress_no_context_takeover, CompressFactory,
    CompressWriter, DecompressFactory,
};
use crate::ws::pool::{BufferPool, PooledWriteBuffer};

/// A full-duplex streaming connection produced by a completed upgrade.
///
/// Reads drain any bytes consumed past the handshake first. Writes stage in
/// a reusable buffer and reach the transport once the configured size is
/// exceeded or on an explicit flush.
pub struct Conn<R, W> {
    transport: Transport<R, W>,
    is_server: bool,
    read_buf_size: usize,
    write_buf_size: usize,
    pool: Option<Arc<dyn BufferPool>>,
    /// staging borrowed from `pool`, held only while bytes are pending
    burst: Option<Vec<u8>>,
    pre_read: Option<Vec<u8>>,
    write_buf: PooledWriteBuffer,
    subprotocol: Option<String>,
    new_compression_writer: Option<CompressFactory>,
    new_decompression_reader: Option<DecompressFactory>,
}

impl<R, W> Conn<R, W>
where
    R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
    W: tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    pub(crate) fn new(
        transport: Transport<R, W>,
        is_server: bool,
        read_buf_size: usize,
        write_buf_size: usize,
        pool: Option<Arc<dyn BufferPool>>,
        pre_read: Option<Vec<u8>>,
        write_buf: PooledWriteBuffer,
    ) -> Self {
        Self {
            transport,
            is_server,
            read_buf_size: if read_buf_size == 0 { 4096 } else { read_buf_size },
            write_buf_size: if write_buf_size == 0 { 4096 } else { write_buf_size },
            pool,
            burst: None,
            pre_read: pre_read.filter(|v| !v.is_empty()),
            write_buf,
            subprotocol: None,
            new_compression_writer: None,
            new_decompression_reader: None,
        }
    }

    pub(crate) fn set_subprotocol(&mut self, proto: String) {
        self.subprotocol = Some(proto);
    }

    pub(crate) fn enable_compression(&mut self) {
        self.new_compression_writer = Some(compress_no_context_takeover);
        self.new_decompression_reader = Some(decompress_no_context_takeover);
    }

    pub fn is_server(&self) -> bool {
        self.is_server
    }

    pub fn subprotocol(&self) -> Option<&str> {
        self.subprotocol.as_deref()
    }

    pub fn compression_enabled(&self) -> bool {
        self.new_compression_writer.is_some()
    }

    /// Builds a per-message compressor when compression was negotiated.
    pub fn compression_writer(
        &self,
        w: Box<dyn std::io::Write + Send>,
    ) -> Option<Box<dyn CompressWriter + Send>> {
        self.new_compression_writer
            .map(|make| make(w, flate2::Compression::default()))
    }

    /// Builds a per-message decompressor when compression was negotiated.
    pub fn decompression_reader(
        &self,
        r: Box<dyn std::io::Read + Send>,
    ) -> Option<Box<dyn std::io::Read + Send>> {
        self.new_decompression_reader.map(|make| make(r))
    }

    pub fn set_deadline(&mut self, deadline: Option<Duration>) {
        self.transport.set_deadline(deadline);
    }

    pub async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if let Some(pre) = &mut self.pre_read {
            let n = pre.len().min(buf.len());
            buf[..n].copy_from_slice(&pre[..n]);
            pre.drain(..n);
            if pre.is_empty() {
                self.pre_read = None;
            }
            return Ok(n);
        }
        let cap = buf.len().min(self.read_buf_size);
        self.transport.read(&mut buf[..cap]).await
    }

    pub async fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        match &self.pool {
            Some(pool) => {
                let mut burst = match self.burst.take() {
                    Some(b) => b,
                    None => pool.get(),
                };
                burst.extend_from_slice(buf);
                self.burst = Some(burst);
            }
            None => {
                self.write_buf.extend_from_slice(buf);
            }
        }
        if self.staged_len() >= self.write_buf_size {
            self.flush().await?;
        }
        Ok(())
    }

    pub async fn flush(&mut self) -> io::Result<()> {
        if let Some(mut burst) = self.burst.take() {
            let result = self.transport.write_all(burst.as_slice()).await;
            burst.clear();
            if let Some(pool) = &self.pool {
                pool.put(burst);
            }
            result?;
            return self.transport.flush().await;
        }

        if !self.write_buf.is_empty() {
            let result = self.transport.write_all(self.write_buf.as_slice()).await;
            self.write_buf.clear();
            result?;
        }
        self.transport.flush().await
    }

    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.flush().await?;
        self.transport.shutdown().await
    }

    fn staged_len(&self) -> usize {
        match &self.burst {
            Some(burst) => burst.len(),
            None => self.write_buf.len(),
        }
    }
}
