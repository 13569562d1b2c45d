mod appender;
mod console_appender;
mod dispatcher;
mod item;
mod json_line_renderer;

pub use appender::{Appender, Color, ColorScheme, ColorfulLineRenderer, Renderer};
pub use console_appender::ConsoleAppender;
pub use dispatcher::init;
pub use item::Item;
pub use json_line_renderer::JsonLineRenderer;
