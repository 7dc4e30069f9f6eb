//! Line-mode terminal client for IOChat.
//!
//! Binds the single-threaded session core to a TCP connection and renders the
//! transcript as plain lines on stdout. All session logic lives in
//! [`iochat_client`]; this crate only moves lines in and out.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod render;
pub mod runtime;

pub use render::{Renderer, format_entry};
pub use runtime::{Runtime, RuntimeError};
