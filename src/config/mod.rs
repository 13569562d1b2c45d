use clap::Parser;
use serde::Deserialize;

mod duration_in_millis;
mod http;
mod logging;
mod size_in_bytes;
mod split_unit;
mod tcp;
mod websocket;

pub use duration_in_millis::DurationInMillis;
pub use http::HttpConfig;
pub use logging::LoggingConfig;
pub use size_in_bytes::SizeInBytes;
pub use tcp::TcpConfig;
pub use websocket::WebSocketConfig;

use crate::utils::anyhow;

#[derive(Deserialize, Clone, Default, Debug)]
pub struct Config {
    #[serde(default, alias = "Addr", alias = "address", alias = "Address")]
    pub addr: String,

    #[serde(default, alias = "Tcp")]
    pub tcp: TcpConfig,

    #[serde(default, alias = "Http")]
    pub http: HttpConfig,

    #[serde(default, alias = "ws", alias = "Websocket", alias = "WebSocket")]
    pub websocket: WebSocketConfig,

    #[serde(default, alias = "Logging")]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(fp: &str) -> anyhow::Result<Config> {
        let txt = anyhow::result(std::fs::read_to_string(fp))?;
        anyhow::result(toml::from_str(txt.as_str()))
    }

    pub fn autofix(&mut self) -> Option<String> {
        if self.addr.is_empty() {
            self.addr = "127.0.0.1:8080".to_string();
        }
        if let Some(e) = self.tcp.autofix() {
            return Some(e);
        }
        if let Some(e) = self.http.autofix() {
            return Some(e);
        }
        if let Some(e) = self.websocket.autofix() {
            return Some(e);
        }
        if let Some(e) = self.logging.autofix() {
            return Some(e);
        }
        None
    }
}

#[derive(Parser, Debug)]
#[command(name = "wsd")]
#[command(about = "A websocket upgrade server", long_about = None)]
pub struct Args {
    /// config file path(toml)
    #[arg(default_value = "")]
    pub file: String,

    /// listening address, overrides the config value
    #[arg(long, default_value = "")]
    pub addr: String,
}
