pub mod command;
pub mod message;
pub mod replies;

pub use command::Command;
pub use message::RawMessage;
pub use replies::{guest_nick, user_prefix, Reply};
