pub mod assets;
pub mod chat;
pub mod config;
pub mod constants;
pub mod error;
pub mod generator;
pub mod render;
pub mod session;
pub mod web_server;

pub use chat::{exchange, Exchange};
pub use error::ChatError;
pub use generator::ResponseGenerator;
pub use session::{Message, Role, Session, SessionId, SessionStore, Transcript};
