//! Proxy module - static GUI server and upload relay

pub mod error;
pub mod form;
pub mod handlers;
pub mod server;
pub mod upstream;

pub use error::{RelayError, UploadError};
pub use server::{AppState, RelayServer};
