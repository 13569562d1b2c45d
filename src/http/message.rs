use bytebuffer::ByteBuffer;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt};

use crate::http::ctx::ConnContext;
use crate::http::headers::Headers;
use crate::utils::time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageReadCode {
    Ok,
    ConnClosed,
    ConnReadError,
    BadFirstLine,
    BadHeaderLine,
    ReachMaxHeaderLineSize,
    ReachMaxHeadersCount,
    ReachMaxBodySize,
}

/// A http/1.1 message. `f0 f1 f2` hold the three first-line fields, for a
/// request `method uri version`, for a response `version code reason`.
pub struct Message {
    pub(crate) f0: String,
    pub(crate) f1: String,
    pub(crate) f2: String,
    pub(crate) headers: Headers,
    pub(crate) body: ByteBuffer,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            f0: String::new(),
            f1: String::new(),
            f2: String::new(),
            headers: Headers::new(),
            body: ByteBuffer::new(),
        }
    }
}

async fn read_limited_line<R, W>(ctx: &mut ConnContext<R, W>) -> Result<(), MessageReadCode>
where
    R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
    W: tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    let limit = ctx.config.http.max_header_line_size.u64();
    ctx.buf.clear();
    match (&mut ctx.reader).take(limit).read_line(&mut ctx.buf).await {
        Ok(0) => Err(MessageReadCode::ConnClosed),
        Ok(n) => {
            if !ctx.buf.ends_with('\n') {
                if n as u64 >= limit {
                    return Err(MessageReadCode::ReachMaxHeaderLineSize);
                }
                return Err(MessageReadCode::ConnClosed);
            }
            Ok(())
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::InvalidData {
                return Err(MessageReadCode::BadHeaderLine);
            }
            Err(MessageReadCode::ConnReadError)
        }
    }
}

impl Message {
    pub(crate) fn clear(&mut self) {
        self.f0.clear();
        self.f1.clear();
        self.f2.clear();
        self.headers.clear();
        self.body.clear();
    }

    pub(crate) async fn read_headers<R, W>(&mut self, ctx: &mut ConnContext<R, W>) -> MessageReadCode
    where
        R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
        W: tokio::io::AsyncWrite + Unpin + Send + 'static,
    {
        // first line, leading blank lines are tolerated
        loop {
            match read_limited_line(ctx).await {
                Ok(()) => {}
                Err(code) => return code,
            }
            let line = ctx.buf.trim_end();
            if line.is_empty() {
                continue;
            }
            if !line.is_ascii() {
                return MessageReadCode::BadFirstLine;
            }

            let mut fls = 0;
            for rune in line.chars() {
                match fls {
                    0 => {
                        if rune == ' ' {
                            fls += 1;
                            continue;
                        }
                        self.f0.push(rune);
                    }
                    1 => {
                        if rune == ' ' {
                            fls += 1;
                            continue;
                        }
                        self.f1.push(rune);
                    }
                    _ => {
                        self.f2.push(rune);
                    }
                }
            }
            if self.f0.is_empty() || self.f1.is_empty() || self.f2.is_empty() {
                return MessageReadCode::BadFirstLine;
            }
            self.f0.make_ascii_uppercase();
            break;
        }

        let max_count = ctx.config.http.max_headers_count;
        let mut count: u32 = 0;
        loop {
            match read_limited_line(ctx).await {
                Ok(()) => {}
                Err(code) => return code,
            }
            let line = ctx.buf.trim_end();
            if line.is_empty() {
                return MessageReadCode::Ok;
            }
            if count >= max_count {
                return MessageReadCode::ReachMaxHeadersCount;
            }
            if !line.is_ascii() {
                return MessageReadCode::BadHeaderLine;
            }

            let mut parts = line.splitn(2, ':');
            let key = match parts.next() {
                Some(v) if !v.trim().is_empty() => v.trim(),
                _ => return MessageReadCode::BadHeaderLine,
            };
            match parts.next() {
                Some(v) => self.headers.append(key, v.trim()),
                None => return MessageReadCode::BadHeaderLine,
            }
            count += 1;
        }
    }

    pub(crate) async fn read_const_length_body<R, W>(
        &mut self,
        ctx: &mut ConnContext<R, W>,
    ) -> MessageReadCode
    where
        R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
        W: tokio::io::AsyncWrite + Unpin + Send + 'static,
    {
        let size = match self.headers.content_length() {
            None => return MessageReadCode::Ok,
            Some(v) => {
                if v < 0 {
                    return MessageReadCode::BadHeaderLine;
                }
                v as u64
            }
        };
        if size == 0 {
            return MessageReadCode::Ok;
        }
        if size > ctx.config.http.max_body_size.u64() {
            return MessageReadCode::ReachMaxBodySize;
        }

        let mut remains = size as usize;
        let mut chunk = [0u8; 4096];
        while remains > 0 {
            let want = remains.min(chunk.len());
            match ctx.reader.read(&mut chunk[..want]).await {
                Ok(0) => return MessageReadCode::ConnClosed,
                Ok(n) => {
                    self.body.write_bytes(&chunk[..n]);
                    remains -= n;
                }
                Err(_) => return MessageReadCode::ConnReadError,
            }
        }
        MessageReadCode::Ok
    }

    pub(crate) async fn write_to<R, W>(&mut self, ctx: &mut ConnContext<R, W>) -> std::io::Result<()>
    where
        R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
        W: tokio::io::AsyncWrite + Unpin + Send + 'static,
    {
        ctx.writer.write_all(self.f0.as_bytes()).await?;
        ctx.writer.write_all(b" ").await?;
        ctx.writer.write_all(self.f1.as_bytes()).await?;
        ctx.writer.write_all(b" ").await?;
        ctx.writer.write_all(self.f2.as_bytes()).await?;
        ctx.writer.write_all(b"\r\n").await?;

        if !self.headers.contains("server") {
            self.headers.set("server", "wsd");
        }
        if !self.headers.contains("date") {
            self.headers.set("date", time::http_header_time().as_str());
        }
        // a 101 hands the stream over as-is, announcing a length would
        // confuse the peer
        if self.f1 != "101" {
            self.headers
                .set("content-length", self.body.len().to_string().as_str());
        }

        ctx.buf.clear();
        let buf = &mut ctx.buf;
        self.headers.each(|k, vs| {
            for v in vs {
                buf.push_str(k);
                buf.push_str(": ");
                buf.push_str(v);
                buf.push_str("\r\n");
            }
        });
        buf.push_str("\r\n");

        ctx.writer.write_all(ctx.buf.as_bytes()).await?;
        if self.body.len() > 0 {
            ctx.writer.write_all(self.body.as_bytes()).await?;
        }
        ctx.writer.flush().await
    }
}
