use std::net::SocketAddr;

use tokio::io::{BufReader, BufWriter};

use crate::config::Config;
use crate::http::ctx::ConnContext;
use crate::http::handler::Handler;
use crate::http::message::MessageReadCode;
use crate::http::request::Request;
use crate::http::response::Response;

fn has_connection_token(req: &Request, token: &str) -> bool {
    match req.headers().get_all("connection") {
        None => false,
        Some(values) => values
            .iter()
            .any(|v| v.split(',').any(|part| part.trim().eq_ignore_ascii_case(token))),
    }
}

fn keep_alive(req: &Request) -> bool {
    if req.version().eq_ignore_ascii_case("HTTP/1.0") {
        return has_connection_token(req, "keep-alive") && !has_connection_token(req, "close");
    }
    !has_connection_token(req, "close")
}

/// Serves one accepted connection until it is closed, times out, or is
/// handed over to another protocol owner.
pub async fn conn<R, W, H>(
    r: R,
    w: W,
    addr: SocketAddr,
    config: &'static Config,
    handler: &'static H,
) where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
    W: tokio::io::AsyncWrite + Unpin + Send + 'static,
    H: Handler,
{
    #[cfg(debug_assertions)]
    {
        log::trace!("connection made, {}", addr);
    }

    let reader = BufReader::with_capacity(config.tcp.read_buf_size.usize(), r);
    let writer = BufWriter::with_capacity(config.tcp.write_buf_size.usize(), w);
    let mut ctx = ConnContext::new(reader, writer, addr, config);

    let mut req = Request::new();
    let mut resp = Response::new();
    let idle = config.tcp.idle_timeout.duration();

    loop {
        match tokio::time::timeout(idle, req.msg.read_headers(&mut ctx)).await {
            Err(_) => break,
            Ok(MessageReadCode::Ok) => {}
            Ok(MessageReadCode::ConnClosed) | Ok(MessageReadCode::ConnReadError) => break,
            Ok(code) => {
                log::trace!("read request header failed, {:?}, {}", code, ctx.addr);
                break;
            }
        }

        match tokio::time::timeout(idle, req.msg.read_const_length_body(&mut ctx)).await {
            Err(_) => break,
            Ok(MessageReadCode::Ok) => {}
            Ok(code) => {
                log::trace!("read request body failed, {:?}, {}", code, ctx.addr);
                break;
            }
        }

        match handler.handle(&mut ctx, &mut req, &mut resp).await {
            Ok(()) => {}
            Err(e) => {
                log::error!("handle failed, {}, {}", e, ctx.addr);
                break;
            }
        }

        resp.autofix();
        let flush_deadline = match &ctx.hijacker {
            Some(hijack) => hijack.deadline.unwrap_or(idle),
            None => idle,
        };
        match tokio::time::timeout(flush_deadline, resp.msg.write_to(&mut ctx)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::debug!("send response failed, {}, {}", e, ctx.addr);
                break;
            }
            Err(_) => {
                log::debug!("send response timeout, {}", ctx.addr);
                break;
            }
        }

        if let Some(hijack) = ctx.hijacker.take() {
            (hijack.cb)(ctx.into_transport()).await;
            return;
        }

        if !keep_alive(&req) {
            break;
        }
        req.clear();
        resp.clear();
    }

    #[cfg(debug_assertions)]
    {
        log::trace!("connection lost, {}", addr);
    }
}
