use serde::Deserialize;

use crate::logging::{
    Appender, ColorfulLineRenderer, ConsoleAppender, JsonLineRenderer, Renderer,
};
use crate::utils::anyhow;

#[derive(Deserialize, Clone, Default, Debug)]
pub struct LoggingConfig {
    #[serde(default, alias = "Level")]
    pub level: String,

    #[serde(default, alias = "Renderer")]
    pub renderer: String,

    #[serde(default, alias = "TimeLayout")]
    pub time_layout: String,
}

impl LoggingConfig {
    pub fn autofix(&mut self) -> Option<String> {
        if self.level.is_empty() {
            self.level = "info".to_string();
        }
        if self.renderer.is_empty() {
            self.renderer = "colorful".to_string();
        }
        None
    }

    fn level_filter(&self) -> anyhow::Result<log::LevelFilter> {
        match self.level.to_lowercase().trim() {
            "trace" => Ok(log::LevelFilter::Trace),
            "debug" => Ok(log::LevelFilter::Debug),
            "" | "info" => Ok(log::LevelFilter::Info),
            "warn" | "warning" => Ok(log::LevelFilter::Warn),
            "error" => Ok(log::LevelFilter::Error),
            "off" | "disable" => Ok(log::LevelFilter::Off),
            _ => anyhow::error(&format!("unknown logging level, `{}`", self.level)),
        }
    }

    pub fn init(&self) -> anyhow::Result<()> {
        let level = self.level_filter()?;
        let renderer: Box<dyn Renderer> = match self.renderer.to_lowercase().trim() {
            "" | "colorful" => Box::new(ColorfulLineRenderer::new("colorful", &self.time_layout)),
            "json" => Box::new(JsonLineRenderer::new("json", &self.time_layout)),
            _ => {
                return anyhow::error(&format!("unknown logging renderer, `{}`", self.renderer));
            }
        };
        let appenders: Vec<Box<dyn Appender>> =
            vec![Box::new(ConsoleAppender::new(renderer.name(), level))];
        crate::logging::init(level, appenders, vec![renderer])
    }
}

#[cfg(test)]
mod tests {
    use super::LoggingConfig;

    #[test]
    fn autofix_fills_defaults() {
        let mut config = LoggingConfig::default();
        assert!(config.autofix().is_none());
        assert_eq!(config.level, "info");
        assert_eq!(config.renderer, "colorful");
    }

    #[test]
    fn rejects_unknown_level() {
        let config = LoggingConfig {
            level: "chatty".to_string(),
            ..Default::default()
        };
        assert!(config.level_filter().is_err());
    }
}
