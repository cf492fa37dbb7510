use crate::config::ServerConfig;
use crate::net::connection::{ConnId, Connection};
use crate::state::channel_store::ChannelStore;
use crate::state::registry::Registry;
use hashbrown::HashMap;

/// All mutable server state, threaded through the reactor and handlers as a
/// single `&mut` borrow. Everything runs on one thread, so there is exactly
/// one owner of the connection table, the nickname registry, and the channel
/// store, and no locking is required.
pub struct ServerState {
    pub config: ServerConfig,
    pub connections: HashMap<ConnId, Connection>,
    pub registry: Registry,
    pub channels: ChannelStore,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> ServerState {
        ServerState {
            config,
            connections: HashMap::new(),
            registry: Registry::new(),
            channels: ChannelStore::new(),
        }
    }

    pub fn server_name(&self) -> &str {
        &self.config.options.server_name
    }

    /// Removes a connection entirely: drops its nickname claim, evicts it from
    /// every channel it was in, and hands back the list of channel names it
    /// left (so the caller can announce the departure before the connection
    /// is gone).
    pub fn drop_connection(&mut self, id: ConnId) -> (Option<Connection>, Vec<String>) {
        self.registry.remove_by_conn(id);
        let left = self.channels.remove_member_everywhere(id);
        (self.connections.remove(&id), left)
    }
}
