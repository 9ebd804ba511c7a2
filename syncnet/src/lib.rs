#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Syncnet - blocking TCP client primitives
//!
//! Syncnet gives a caller four call-and-return socket operations without
//! exposing descriptors or address resolution:
//!
//! - [`connect`] resolves a host and port and connects to the first
//!   resolved address that accepts,
//! - [`send`] transmits an arbitrary-length payload in buffer-sized chunks,
//! - [`recv`] performs a single receive of up to one buffer,
//! - [`close`] closes the connection and reports the status.
//!
//! Every call blocks until its syscall completes. There are no background
//! threads, no retries and no pooling; one [`Connection`] is one socket,
//! owned by the caller.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> syncnet::Result<()> {
//!   let conn = syncnet::connect(9999, Some("127.0.0.1"))?;
//!
//!   let sent = syncnet::send(&conn, "ping")?;
//!   assert_eq!(sent, 4);
//!
//!   let reply = syncnet::recv(&conn)?;
//!   println!("peer said {reply}");
//!
//!   assert_eq!(syncnet::close(conn), 0);
//!   Ok(())
//! }
//! ```
//!
//! The free functions use [`Config::default`]. Build a [`Client`] to change
//! the default host, the buffer size or add timeouts.
//!
//! ## Error Handling
//!
//! Connect, send and receive return [`Result`]. [`Error::kind`] separates
//! argument mistakes from transport failures. Closing never fails with an
//! error; it returns the `close(2)` status instead.
//!
//! ## Logging
//!
//! Resolution, connect attempts and short writes are reported through
//! [`tracing`] at `debug`, individual chunks at `trace`. Installing a
//! subscriber is left to the application.

#[cfg(not(unix))]
compile_error!("syncnet only supports unix targets");

#[macro_use]
mod macros;

pub mod binding;
mod client;
mod config;
mod connection;
mod connector;
mod error;
#[cfg(feature = "unstable_ffi")]
#[cfg_attr(docsrs, doc(cfg(feature = "unstable_ffi")))]
pub mod ffi;
mod net_utils;
mod receiver;
pub mod resolve;
mod sender;
mod sys;
#[doc(hidden)]
pub mod test_utils;
mod transport;

pub use client::Client;
pub use config::{BufferSize, Config, DEFAULT_HOST};
pub use connection::Connection;
pub use connector::connect_first;
pub use error::{ArgumentError, Error, ErrorKind, RecvFailure, Result};
pub use receiver::recv_once;
pub use resolve::{Endpoint, ResolveError};
pub use sender::send_chunked;
pub use transport::Transport;

static DEFAULT_CLIENT: Client = Client::new(Config::new());

/// Connects to `port` on `host`, or on [`DEFAULT_HOST`] when `host` is
/// `None`.
///
/// The host is resolved into candidate addresses which are tried in resolver
/// order; the first one that accepts wins.
pub fn connect(port: u16, host: Option<&str>) -> Result<Connection> {
  DEFAULT_CLIENT.connect(port, host)
}

/// Sends `payload` in chunks of up to 4095 bytes and returns the number of
/// bytes confirmed sent.
///
/// A short write ends the call early with the partial total; a failed
/// transmission returns [`Error::Send`] and no count.
pub fn send(conn: &Connection, payload: impl AsRef<[u8]>) -> Result<usize> {
  DEFAULT_CLIENT.send(conn, payload)
}

/// Receives up to 4095 bytes once and returns them as text.
///
/// Fails with [`Error::Recv`] when nothing arrives, including when the peer
/// has closed the connection.
pub fn recv(conn: &Connection) -> Result<String> {
  DEFAULT_CLIENT.recv(conn)
}

/// Closes `conn`; `0` on success, `-1` on failure.
pub fn close(conn: Connection) -> i32 {
  conn.close()
}
