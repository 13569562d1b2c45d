use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use wsd::config::{Args, Config};
use wsd::http::{self, ConnContext, Handler, Request, Response};
use wsd::utils::{anyhow, time, AutoCounter};
use wsd::ws::{is_websocket_upgrade, Upgrader};

static ALIVE: AtomicI64 = AtomicI64::new(0);

/// Echoes raw bytes on upgraded streams, greets everyone else.
struct RootHandler {
    upgrader: Upgrader,
}

impl Handler for RootHandler {
    async fn handle<R, W>(
        &self,
        ctx: &mut ConnContext<R, W>,
        req: &mut Request,
        resp: &mut Response,
    ) -> anyhow::Result<()>
    where
        R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
        W: tokio::io::AsyncWrite + Unpin + Send + 'static,
    {
        if is_websocket_upgrade(req) {
            let result = self.upgrader.upgrade(ctx, req, resp, |mut conn| async move {
                let mut buf = [0u8; 4096];
                loop {
                    match conn.read(&mut buf).await {
                        Ok(0) | Err(_) => {
                            break;
                        }
                        Ok(n) => {
                            if conn.write(&buf[..n]).await.is_err() {
                                break;
                            }
                            if conn.flush().await.is_err() {
                                break;
                            }
                        }
                    }
                }
                let _ = conn.shutdown().await;
            });
            if let Err(err) = result {
                log::debug!(addr = ctx.addr().to_string(); "upgrade refused: {}", err);
            }
            return Ok(());
        }

        resp.headers_mut().set("content-type", "text/plain");
        resp.write("hello world!".as_bytes());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config;
    if args.file.is_empty() {
        config = Config::default();
    } else {
        config = Config::load(args.file.as_str())?;
    }
    if !args.addr.is_empty() {
        config.addr = args.addr.clone();
    }
    if let Some(msg) = config.autofix() {
        return anyhow::error(msg.as_str());
    }
    config.logging.init()?;

    let config: &'static Config = Box::leak(Box::new(config));
    let handler: &'static RootHandler = Box::leak(Box::new(RootHandler {
        upgrader: Upgrader::from_config(&config.websocket),
    }));

    let listener = anyhow::result(TcpListener::bind(config.addr.as_str()).await)?;
    println!(
        "[{}] wsd listening @ {}, Pid: {}",
        time::currentstr(None),
        config.addr.as_str(),
        std::process::id()
    );

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Err(_) => {
                        continue;
                    }
                    Ok((stream, addr)) => {
                        tokio::spawn(async move {
                            let _counter = AutoCounter::new(&ALIVE);
                            let (r, w) = stream.into_split();
                            http::conn(r, w, addr, config, handler).await;
                        });
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("[{}] wsd is preparing to shutdown", time::currentstr(None));
                loop {
                    if ALIVE.load(Ordering::Relaxed) < 1 {
                        break;
                    }
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
                log::logger().flush();
                println!("[{}] wsd is gracefully shutdown", time::currentstr(None));
                return Ok(());
            }
        }
    }
}
