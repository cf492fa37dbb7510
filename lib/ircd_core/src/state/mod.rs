pub mod channel;
pub mod channel_store;
pub mod registry;
pub mod server;

pub use channel::{Channel, ChannelModes};
pub use channel_store::ChannelStore;
pub use registry::Registry;
pub use server::ServerState;
