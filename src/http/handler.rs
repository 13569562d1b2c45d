use std::future::Future;

use crate::http::ctx::ConnContext;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::utils::anyhow;

/// A request entrypoint. One instance serves every connection, so state
/// lives behind `&self`.
pub trait Handler: Send + Sync + 'static {
    fn handle<R, W>(
        &self,
        ctx: &mut ConnContext<R, W>,
        req: &mut Request,
        resp: &mut Response,
    ) -> impl Future<Output = anyhow::Result<()>> + Send
    where
        R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
        W: tokio::io::AsyncWrite + Unpin + Send + 'static;
}
