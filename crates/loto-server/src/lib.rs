//! Lottery intake server runtime.
//!
//! Wraps `loto_core`'s sans-IO session state machine with real sockets:
//! [`Server`] owns the listener and spawns one task per connection, which
//! `session_handler::handle_connection` drives using a shared
//! [`loto_core::BarrierState`] and a [`store::BetStoreHandle`].

pub mod config;
pub mod error;
pub mod server;
pub mod session_handler;
pub mod store;

pub use config::{Args, ServerConfig};
pub use error::ServerError;
pub use server::Server;
