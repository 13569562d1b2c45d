use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::config::Config;

pub(crate) type HijackFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

pub(crate) type HijackFn<R, W> = Box<dyn FnOnce(Transport<R, W>) -> HijackFuture + Send>;

pub(crate) struct Hijack<R, W> {
    pub(crate) deadline: Option<Duration>,
    pub(crate) cb: HijackFn<R, W>,
}

/// The buffered halves of an accepted connection, detached from the serve loop.
///
/// Every io op honors the current deadline. Once the connection leaves the
/// http world the new owner usually calls [`Transport::clear_deadline`] and
/// manages its own timeouts.
pub struct Transport<R, W> {
    pub(crate) reader: R,
    pub(crate) writer: W,
    pub(crate) deadline: Option<Duration>,
}

impl<R, W> Transport<R, W>
where
    R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
    W: tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    pub fn clear_deadline(&mut self) {
        self.deadline = None;
    }

    pub fn set_deadline(&mut self, deadline: Option<Duration>) {
        self.deadline = deadline;
    }

    pub async fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.deadline {
            None => self.reader.read(buf).await,
            Some(d) => match tokio::time::timeout(d, self.reader.read(buf)).await {
                Ok(v) => v,
                Err(_) => Err(std::io::ErrorKind::TimedOut.into()),
            },
        }
    }

    pub async fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        match self.deadline {
            None => self.writer.write_all(buf).await,
            Some(d) => match tokio::time::timeout(d, self.writer.write_all(buf)).await {
                Ok(v) => v,
                Err(_) => Err(std::io::ErrorKind::TimedOut.into()),
            },
        }
    }

    pub async fn flush(&mut self) -> std::io::Result<()> {
        match self.deadline {
            None => self.writer.flush().await,
            Some(d) => match tokio::time::timeout(d, self.writer.flush()).await {
                Ok(v) => v,
                Err(_) => Err(std::io::ErrorKind::TimedOut.into()),
            },
        }
    }

    pub async fn shutdown(&mut self) -> std::io::Result<()> {
        self.writer.shutdown().await
    }
}

pub struct ConnContext<R, W>
where
    R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
    W: tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    pub(crate) reader: R,
    pub(crate) writer: W,
    pub(crate) buf: String,
    pub(crate) addr: SocketAddr,
    pub(crate) config: &'static Config,
    pub(crate) hijacker: Option<Hijack<R, W>>,
}

impl<R, W> ConnContext<R, W>
where
    R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
    W: tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    pub(crate) fn new(r: R, w: W, addr: SocketAddr, config: &'static Config) -> Self {
        Self {
            reader: r,
            writer: w,
            buf: String::with_capacity(512),
            addr,
            config,
            hijacker: None,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn config(&self) -> &'static Config {
        self.config
    }

    /// Stages a one-shot ownership transfer of the underlying transport.
    ///
    /// The serve loop runs the callback after the pending response reaches
    /// the peer, then never touches the connection again. `deadline` bounds
    /// that final response flush.
    pub fn hijack<F, Fut>(&mut self, deadline: Option<Duration>, cb: F)
    where
        F: FnOnce(Transport<R, W>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        debug_assert!(self.hijacker.is_none());
        self.hijacker = Some(Hijack {
            deadline,
            cb: Box::new(move |transport| Box::pin(cb(transport))),
        });
    }

    pub fn hijacked(&self) -> bool {
        self.hijacker.is_some()
    }

    pub(crate) fn into_transport(self) -> Transport<R, W> {
        Transport {
            reader: self.reader,
            writer: self.writer,
            deadline: Some(self.config.tcp.idle_timeout.duration()),
        }
    }
}
