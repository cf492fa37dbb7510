//! Shared, dependency-light support code used by `ircd_core` and the
//! `ircd_runner` binary: the network error taxonomy and the logging facade.
//!
//! Kept separate from the core crate since neither piece depends on the
//! reactor or protocol types — small, stable building blocks the rest of the
//! tree builds on.

pub mod errors;
pub mod logging;

pub use errors::{ErrorUtils, NetError, NetErrorKind, NetResult};
