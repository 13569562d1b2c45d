mod conn;
mod ctx;
mod handler;
mod headers;
mod message;
mod request;
mod response;

pub use conn::conn;
pub use ctx::{ConnContext, Transport};
pub use handler::Handler;
pub use headers::Headers;
pub use message::{Message, MessageReadCode};
pub use request::Request;
pub use response::{status_text, Response};
