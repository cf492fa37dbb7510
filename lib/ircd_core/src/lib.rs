//! The IRC reactor, protocol, and state model. Kept separate from the binary
//! crate so the runner binary only wires up CLI, signals, and logging, then
//! hands off here for the actual server.

pub mod config;
pub mod handlers;
pub mod net;
pub mod proto;
pub mod state;

use config::ServerConfig;
use ircd_support::logging::Logger;
use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Binds the listening socket and runs the reactor until `shutdown` is set.
pub fn run(config: ServerConfig, shutdown: Arc<AtomicBool>, log: Logger) -> io::Result<()> {
    let reactor = net::Reactor::bind(config.port)?;
    reactor.run(config, shutdown, log)
}
