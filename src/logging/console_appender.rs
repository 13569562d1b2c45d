use std::io::Write;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::logging::appender::Appender;
use crate::logging::item::Item;

pub struct ConsoleAppender {
    renderer: String,
    level: log::LevelFilter,
}

impl ConsoleAppender {
    pub fn new(renderer: &str, level: log::LevelFilter) -> Self {
        Self {
            renderer: renderer.to_string(),
            level,
        }
    }
}

impl tokio::io::AsyncWrite for ConsoleAppender {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, std::io::Error>> {
        let mut stdout = std::io::stdout();
        match stdout.write_all(buf) {
            Ok(_) => Poll::Ready(Ok(buf.len())),
            Err(e) => Poll::Ready(Err(e)),
        }
    }

    fn poll_flush(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<(), std::io::Error>> {
        Poll::Ready(std::io::stdout().flush())
    }

    fn poll_shutdown(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<(), std::io::Error>> {
        self.poll_flush(cx)
    }
}

impl Appender for ConsoleAppender {
    fn renderer(&self) -> &str {
        &self.renderer
    }

    fn filter(&self, item: &Item) -> bool {
        item.level <= self.level
    }
}
