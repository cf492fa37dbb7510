pub mod broadcaster;
pub mod buffer;
pub mod connection;
pub mod framer;
pub mod reactor;

pub use buffer::Buffer;
pub use connection::{ConnId, ConnPhase, Connection};
pub use framer::Framer;
pub use reactor::Reactor;
