//! Terminal client for the courier server.
//!
//! `courier-core` decides what goes on the wire; this crate owns the I/O:
//! a ureq transport for requests, a raw rustls handshake for inspecting the
//! negotiated session, and the interactive menu that ties them together.

pub mod config;
pub mod menu;
pub mod probe;
pub mod session;
pub mod transport;

pub use config::ClientSettings;
pub use menu::{run_menu, Command, Session};
pub use session::LiveSession;
pub use transport::Transport;
