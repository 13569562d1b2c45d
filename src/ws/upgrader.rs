use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::WebSocketConfig;
use crate::http::{status_text, ConnContext, Request, Response};
use crate::ws::conn::Conn;
use crate::ws::deflate::EXTENSIONS_HEADER_VALUE;
use crate::ws::error::HandshakeError;
use crate::ws::key::compute_accept_key;
use crate::ws::origin::same_origin;
use crate::ws::pool::{self, BufferPool};
use crate::ws::token;

pub type OriginChecker = Box<dyn Fn(&Request) -> bool + Send + Sync>;

pub type RejectHandler = Box<dyn Fn(&mut Response, u16, &HandshakeError) + Send + Sync>;

/// Negotiates websocket sessions over accepted http requests.
///
/// One instance serves a whole endpoint and is read-only during handshakes.
pub struct Upgrader {
    pub read_buffer_size: usize,
    pub write_buffer_size: usize,
    /// bounds the final response flush, `None` leaves the serve loop timeout
    pub handshake_timeout: Option<Duration>,
    /// server preference order, `None` defers to any application preset
    pub subprotocols: Option<Vec<String>>,
    pub enable_compression: bool,
    pub write_buffer_pool: Option<Arc<dyn BufferPool>>,
    pub check_origin: Option<OriginChecker>,
    pub on_reject: Option<RejectHandler>,
}

impl Default for Upgrader {
    fn default() -> Self {
        Self {
            read_buffer_size: 4096,
            write_buffer_size: 4096,
            handshake_timeout: None,
            subprotocols: None,
            enable_compression: false,
            write_buffer_pool: None,
            check_origin: None,
            on_reject: None,
        }
    }
}

impl Upgrader {
    pub fn from_config(cfg: &WebSocketConfig) -> Self {
        Self {
            read_buffer_size: cfg.read_buf_size.usize(),
            write_buffer_size: cfg.write_buf_size.usize(),
            handshake_timeout: if cfg.handshake_timeout.is_zero() {
                None
            } else {
                Some(cfg.handshake_timeout.duration())
            },
            subprotocols: if cfg.subprotocols.is_empty() {
                None
            } else {
                Some(cfg.subprotocols.clone())
            },
            enable_compression: cfg.enable_compression,
            ..Self::default()
        }
    }

    fn select_subprotocol(&self, req: &Request, resp: &Response) -> Option<String> {
        match &self.subprotocols {
            Some(wants) => {
                let offered = token::values(req.headers(), "sec-websocket-protocol");
                for want in wants {
                    for got in &offered {
                        if want == got {
                            return Some(want.clone());
                        }
                    }
                }
                None
            }
            None => resp.headers().get("sec-websocket-protocol").cloned(),
        }
    }

    fn reject(&self, resp: &mut Response, err: HandshakeError) -> Result<(), HandshakeError> {
        match &self.on_reject {
            Some(cb) => {
                cb(resp, err.status(), &err);
            }
            None => {
                resp.msg.body.clear();
                resp.set_code(err.status());
                resp.headers_mut().set("sec-websocket-version", "13");
                resp.headers_mut()
                    .set("content-type", "text/plain; charset=utf-8");
                resp.write(status_text(err.status()).as_bytes());
            }
        }
        Err(err)
    }

    /// Negotiates one websocket session.
    ///
    /// On success the `101` response is staged on `resp` and `handler` is
    /// scheduled to run with the streaming connection once the serve loop
    /// has flushed that response to the peer. On failure the rejection
    /// response is staged and the error returned.
    pub fn upgrade<R, W, H, Fut>(
        &self,
        ctx: &mut ConnContext<R, W>,
        req: &Request,
        resp: &mut Response,
        handler: H,
    ) -> Result<(), HandshakeError>
    where
        R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
        W: tokio::io::AsyncWrite + Unpin + Send + 'static,
        H: FnOnce(Conn<R, W>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if req.method() != "GET" {
            return self.reject(resp, HandshakeError::WrongMethod);
        }
        if !token::contains(req.headers(), "connection", "upgrade") {
            return self.reject(resp, HandshakeError::MissingConnectionToken);
        }
        if !token::contains(req.headers(), "upgrade", "websocket") {
            return self.reject(resp, HandshakeError::MissingUpgradeToken);
        }
        if !token::contains(req.headers(), "sec-websocket-version", "13") {
            return self.reject(resp, HandshakeError::UnsupportedVersion);
        }
        if resp.headers().contains("sec-websocket-extensions") {
            return self.reject(resp, HandshakeError::UnexpectedExtensionsHeader);
        }
        let challenge = match req.headers().get("sec-websocket-key") {
            Some(v) if !v.is_empty() => v.clone(),
            _ => return self.reject(resp, HandshakeError::MissingKey),
        };
        let origin_ok = match &self.check_origin {
            Some(check) => check(req),
            None => same_origin(req),
        };
        if !origin_ok {
            return self.reject(resp, HandshakeError::OriginForbidden);
        }

        let subprotocol = self.select_subprotocol(req, resp);
        let compress = self.enable_compression
            && token::values(req.headers(), "sec-websocket-extensions")
                .iter()
                .any(|ext| ext.starts_with("permessage-deflate"));

        // a 101 must not carry a body
        resp.msg.body.clear();
        resp.set_code(101);
        resp.headers_mut().set("upgrade", "websocket");
        resp.headers_mut().set("connection", "Upgrade");
        resp.headers_mut()
            .set("sec-websocket-accept", &compute_accept_key(&challenge));
        if compress {
            resp.headers_mut()
                .set("sec-websocket-extensions", EXTENSIONS_HEADER_VALUE);
        }
        if let Some(proto) = &subprotocol {
            resp.headers_mut().set("sec-websocket-protocol", proto);
        }

        let write_buf = pool::shared().checkout();
        let user_pool = self.write_buffer_pool.clone();
        let read_buf_size = self.read_buffer_size;
        let write_buf_size = self.write_buffer_size;

        ctx.hijack(self.handshake_timeout, move |mut transport| async move {
            transport.clear_deadline();
            let mut conn = Conn::new(
                transport,
                true,
                read_buf_size,
                write_buf_size,
                user_pool,
                None,
                write_buf,
            );
            if let Some(proto) = subprotocol {
                conn.set_subprotocol(proto);
            }
            if compress {
                conn.enable_compression();
            }
            handler(conn).await;
        });

        Ok(())
    }
}

/// Tells whether a request is asking for a websocket upgrade at all.
pub fn is_websocket_upgrade(req: &Request) -> bool {
    token::contains(req.headers(), "connection", "upgrade")
        && token::contains(req.headers(), "upgrade", "websocket")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::{is_websocket_upgrade, Upgrader};
    use crate::config::Config;
    use crate::http::{ConnContext, Handler, Request, Response};
    use crate::ws::deflate::EXTENSIONS_HEADER_VALUE;
    use crate::ws::error::HandshakeError;
    use crate::ws::pool;

    const SAMPLE_KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";
    const SAMPLE_ACCEPT: &str = "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=";

    fn testconfig() -> &'static Config {
        let mut config = Config::default();
        config.autofix();
        Box::leak(Box::new(config))
    }

    type TestCtx = ConnContext<tokio::io::BufReader<&'static [u8]>, std::io::Cursor<Vec<u8>>>;

    fn testctx() -> TestCtx {
        ConnContext::new(
            tokio::io::BufReader::new(b"".as_slice()),
            std::io::Cursor::new(Vec::new()),
            "127.0.0.1:9".parse().unwrap(),
            testconfig(),
        )
    }

    fn valid_request() -> Request {
        let mut req = Request::new();
        req.msg.f0 = "GET".to_string();
        req.msg.f1 = "/chat".to_string();
        req.msg.f2 = "HTTP/1.1".to_string();
        let headers = req.headers_mut();
        headers.set("host", "server.example.com");
        headers.set("upgrade", "websocket");
        headers.set("connection", "keep-alive, Upgrade");
        headers.set("sec-websocket-key", SAMPLE_KEY);
        headers.set("sec-websocket-version", "13");
        req
    }

    fn noop(_conn: crate::ws::Conn<tokio::io::BufReader<&'static [u8]>, std::io::Cursor<Vec<u8>>>) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }

    #[tokio::test]
    async fn valid_handshake_gets_switching_protocols() {
        let up = Upgrader::default();
        let mut ctx = testctx();
        let req = valid_request();
        let mut resp = Response::new();

        up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap();

        assert_eq!(resp.code(), 101);
        assert_eq!(resp.headers().get("upgrade").unwrap(), "websocket");
        assert_eq!(resp.headers().get("connection").unwrap(), "Upgrade");
        assert_eq!(
            resp.headers().get("sec-websocket-accept").unwrap(),
            SAMPLE_ACCEPT
        );
        assert!(!resp.headers().contains("sec-websocket-extensions"));
        assert!(!resp.headers().contains("sec-websocket-protocol"));
        assert!(resp.body().is_empty());
        assert!(ctx.hijacked());
    }

    #[tokio::test]
    async fn missing_or_empty_key_is_rejected() {
        for break_it in [
            (|req: &mut Request| req.headers_mut().remove("sec-websocket-key"))
                as fn(&mut Request),
            |req| req.headers_mut().set("sec-websocket-key", ""),
        ] {
            let up = Upgrader::default();
            let mut ctx = testctx();
            let mut req = valid_request();
            break_it(&mut req);
            let mut resp = Response::new();

            let err = up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap_err();
            assert!(matches!(err, HandshakeError::MissingKey));
            assert_eq!(resp.code(), 400);
            assert_eq!(resp.headers().get("sec-websocket-version").unwrap(), "13");
            assert_eq!(resp.body(), b"Bad Request");
            assert!(!ctx.hijacked());
        }
    }

    #[tokio::test]
    async fn non_get_method_wins_over_every_other_defect() {
        let up = Upgrader::default();
        let mut ctx = testctx();
        let mut req = valid_request();
        req.msg.f0 = "POST".to_string();
        req.headers_mut().remove("sec-websocket-key");
        req.headers_mut().set("sec-websocket-version", "8");
        let mut resp = Response::new();

        let err = up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap_err();
        assert!(matches!(err, HandshakeError::WrongMethod));
        assert_eq!(resp.code(), 405);
        assert_eq!(resp.body(), b"Method Not Allowed");
    }

    #[tokio::test]
    async fn connection_and_upgrade_tokens_are_required() {
        let up = Upgrader::default();

        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut().set("connection", "close");
        let mut resp = Response::new();
        let err = up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap_err();
        assert!(matches!(err, HandshakeError::MissingConnectionToken));
        assert_eq!(resp.code(), 400);

        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut().set("upgrade", "h2c");
        let mut resp = Response::new();
        let err = up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap_err();
        assert!(matches!(err, HandshakeError::MissingUpgradeToken));
        assert_eq!(resp.code(), 400);
    }

    #[tokio::test]
    async fn version_must_offer_13() {
        let up = Upgrader::default();
        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut().set("sec-websocket-version", "8");
        let mut resp = Response::new();

        let err = up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap_err();
        assert!(matches!(err, HandshakeError::UnsupportedVersion));
        assert_eq!(resp.code(), 400);
    }

    #[tokio::test]
    async fn preset_extensions_header_is_a_server_error() {
        let up = Upgrader::default();
        let mut ctx = testctx();
        let req = valid_request();
        let mut resp = Response::new();
        resp.headers_mut()
            .set("sec-websocket-extensions", "permessage-deflate");

        let err = up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap_err();
        assert!(matches!(err, HandshakeError::UnexpectedExtensionsHeader));
        assert_eq!(resp.code(), 500);
    }

    #[tokio::test]
    async fn foreign_origin_is_rejected_after_the_key_check() {
        let up = Upgrader::default();

        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut().set("origin", "http://evil.example");
        let mut resp = Response::new();
        let err = up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap_err();
        assert!(matches!(err, HandshakeError::OriginForbidden));
        assert_eq!(resp.code(), 403);

        // a missing key is reported before the origin is even looked at
        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut().set("origin", "http://evil.example");
        req.headers_mut().remove("sec-websocket-key");
        let mut resp = Response::new();
        let err = up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap_err();
        assert!(matches!(err, HandshakeError::MissingKey));
        assert_eq!(resp.code(), 400);
    }

    #[tokio::test]
    async fn custom_origin_checker_replaces_the_default() {
        let mut up = Upgrader::default();
        up.check_origin = Some(Box::new(|_req| true));
        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut().set("origin", "http://evil.example");
        let mut resp = Response::new();
        up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap();
        assert_eq!(resp.code(), 101);

        let mut up = Upgrader::default();
        up.check_origin = Some(Box::new(|_req| false));
        let mut ctx = testctx();
        let req = valid_request();
        let mut resp = Response::new();
        let err = up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap_err();
        assert!(matches!(err, HandshakeError::OriginForbidden));
        assert_eq!(resp.code(), 403);
    }

    #[tokio::test]
    async fn subprotocol_follows_server_preference_order() {
        let mut up = Upgrader::default();
        up.subprotocols = Some(vec!["v2".to_string(), "v1".to_string()]);
        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut().set("sec-websocket-protocol", "v1, v2");
        let mut resp = Response::new();

        up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap();
        assert_eq!(resp.headers().get("sec-websocket-protocol").unwrap(), "v2");

        let mut up = Upgrader::default();
        up.subprotocols = Some(vec!["v9".to_string()]);
        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut().set("sec-websocket-protocol", "v1");
        let mut resp = Response::new();

        up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap();
        assert!(!resp.headers().contains("sec-websocket-protocol"));
    }

    #[tokio::test]
    async fn preset_protocol_header_passes_through_without_a_server_list() {
        let up = Upgrader::default();
        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut().set("sec-websocket-protocol", "graphql-ws");
        let mut resp = Response::new();
        resp.headers_mut().set("sec-websocket-protocol", "graphql-ws");

        up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap();
        assert_eq!(resp.code(), 101);
        assert_eq!(
            resp.headers().get("sec-websocket-protocol").unwrap(),
            "graphql-ws"
        );
    }

    #[tokio::test]
    async fn compression_needs_both_sides_to_opt_in() {
        let mut up = Upgrader::default();
        up.enable_compression = true;
        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut().set(
            "sec-websocket-extensions",
            "permessage-deflate; client_max_window_bits",
        );
        let mut resp = Response::new();
        up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap();
        assert_eq!(
            resp.headers().get("sec-websocket-extensions").unwrap(),
            EXTENSIONS_HEADER_VALUE
        );

        let mut up = Upgrader::default();
        up.enable_compression = true;
        let mut ctx = testctx();
        let req = valid_request();
        let mut resp = Response::new();
        up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap();
        assert!(!resp.headers().contains("sec-websocket-extensions"));

        let up = Upgrader::default();
        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut()
            .set("sec-websocket-extensions", "permessage-deflate");
        let mut resp = Response::new();
        up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap();
        assert!(!resp.headers().contains("sec-websocket-extensions"));
    }

    #[tokio::test]
    async fn custom_reject_handler_owns_the_error_response() {
        let mut up = Upgrader::default();
        up.on_reject = Some(Box::new(|resp, status, err| {
            resp.set_code(status);
            resp.headers_mut().set("x-reason", err.reason());
        }));
        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut().set("sec-websocket-version", "8");
        let mut resp = Response::new();

        let err = up.upgrade(&mut ctx, &req, &mut resp, noop).unwrap_err();
        assert!(matches!(err, HandshakeError::UnsupportedVersion));
        assert_eq!(resp.code(), 400);
        assert!(resp
            .headers()
            .get("x-reason")
            .unwrap()
            .contains("unsupported version"));
        assert!(!resp.headers().contains("sec-websocket-version"));
        assert!(resp.body().is_empty());
    }

    #[tokio::test]
    async fn handoff_passes_negotiation_results_to_the_connection() {
        let mut up = Upgrader::default();
        up.subprotocols = Some(vec!["chat".to_string()]);
        up.enable_compression = true;
        let mut ctx = testctx();
        let mut req = valid_request();
        req.headers_mut().set("sec-websocket-protocol", "chat");
        req.headers_mut()
            .set("sec-websocket-extensions", "permessage-deflate");
        let mut resp = Response::new();

        let seen: Arc<Mutex<Option<(Option<String>, bool, bool)>>> = Arc::new(Mutex::new(None));
        let seen2 = seen.clone();
        up.upgrade(&mut ctx, &req, &mut resp, move |conn| async move {
            *seen2.lock().unwrap() = Some((
                conn.subprotocol().map(str::to_string),
                conn.compression_enabled(),
                conn.is_server(),
            ));
        })
        .unwrap();

        let hijack = ctx.hijacker.take().unwrap();
        (hijack.cb)(ctx.into_transport()).await;

        let got = seen.lock().unwrap().take().unwrap();
        assert_eq!(got.0.as_deref(), Some("chat"));
        assert!(got.1);
        assert!(got.2);
    }

    #[tokio::test]
    async fn upgrade_cycles_release_every_checked_out_buffer() {
        let baseline = pool::shared().outstanding();

        for _ in 0..5 {
            let up = Upgrader::default();
            let mut ctx = testctx();
            let req = valid_request();
            let mut resp = Response::new();
            let done = Arc::new(AtomicBool::new(false));
            let done2 = done.clone();

            up.upgrade(&mut ctx, &req, &mut resp, move |mut conn| async move {
                conn.write(b"x").await.unwrap();
                conn.flush().await.unwrap();
                done2.store(true, Ordering::SeqCst);
            })
            .unwrap();

            let hijack = ctx.hijacker.take().unwrap();
            (hijack.cb)(ctx.into_transport()).await;
            assert!(done.load(Ordering::SeqCst));
        }

        // other tests may briefly hold checkouts of their own
        for _ in 0..200 {
            if pool::shared().outstanding() <= baseline {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(pool::shared().outstanding() <= baseline);
    }

    #[test]
    fn upgrade_requests_are_recognized_by_tokens() {
        let req = valid_request();
        assert!(is_websocket_upgrade(&req));

        let mut req = valid_request();
        req.headers_mut().set("connection", "close");
        assert!(!is_websocket_upgrade(&req));

        let mut req = valid_request();
        req.headers_mut().set("upgrade", "h2c");
        assert!(!is_websocket_upgrade(&req));
    }

    struct UpgradeEcho {
        upgrader: Upgrader,
    }

    impl Handler for UpgradeEcho {
        async fn handle<R, W>(
            &self,
            ctx: &mut ConnContext<R, W>,
            req: &mut Request,
            resp: &mut Response,
        ) -> crate::utils::anyhow::Result<()>
        where
            R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
            W: tokio::io::AsyncWrite + Unpin + Send + 'static,
        {
            let _ = self.upgrader.upgrade(ctx, req, resp, |mut conn| async move {
                let mut buf = [0u8; 256];
                let n = conn.read(&mut buf).await.unwrap();
                conn.write(&buf[..n]).await.unwrap();
                let _ = conn.shutdown().await;
            });
            Ok(())
        }
    }

    #[tokio::test]
    async fn handler_runs_on_the_raw_stream_after_the_response_is_flushed() {
        let handler: &'static UpgradeEcho = Box::leak(Box::new(UpgradeEcho {
            upgrader: Upgrader::default(),
        }));
        let (client, server) = tokio::io::duplex(16384);
        let (server_r, server_w) = tokio::io::split(server);
        let (mut client_r, mut client_w) = tokio::io::split(client);

        let addr: std::net::SocketAddr = "127.0.0.1:9".parse().unwrap();
        let serve = tokio::spawn(crate::http::conn(
            server_r,
            server_w,
            addr,
            testconfig(),
            handler,
        ));

        client_w
            .write_all(
                b"GET /chat HTTP/1.1\r\n\
                  host: server.example.com\r\n\
                  connection: Upgrade\r\n\
                  upgrade: websocket\r\n\
                  sec-websocket-version: 13\r\n\
                  sec-websocket-key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
                  \r\n",
            )
            .await
            .unwrap();
        client_w.write_all(b"hello raw stream").await.unwrap();

        let mut all = Vec::new();
        tokio::time::timeout(Duration::from_secs(5), client_r.read_to_end(&mut all))
            .await
            .unwrap()
            .unwrap();

        let pos = all.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let head = String::from_utf8_lossy(&all[..pos]).to_string();
        assert!(head.starts_with("HTTP/1.1 101 Switching Protocols"));
        assert!(head.contains("upgrade: websocket"));
        assert!(head.contains("connection: Upgrade"));
        assert!(head.contains(&format!("sec-websocket-accept: {}", SAMPLE_ACCEPT)));
        assert!(!head.contains("content-length"));
        assert_eq!(&all[pos + 4..], b"hello raw stream");

        tokio::time::timeout(Duration::from_secs(5), serve)
            .await
            .unwrap()
            .unwrap();
    }
}
