//! Helpers shared by the integration tests.
//!
//! Peers are plain `std::net` sockets so the crate under test never talks to
//! itself.

use std::{
  io,
  net::{SocketAddr, TcpListener},
};

/// Binds a listener on an ephemeral loopback port.
#[doc(hidden)]
pub fn loopback_listener() -> (TcpListener, SocketAddr) {
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  let addr = listener.local_addr().unwrap();
  (listener, addr)
}

/// A loopback address nothing is listening on.
///
/// The port was bound a moment ago and released, so connecting to it is
/// refused.
#[doc(hidden)]
pub fn refused_addr() -> SocketAddr {
  let (listener, addr) = loopback_listener();
  drop(listener);
  addr
}

/// Counts the descriptors this process currently has open.
#[doc(hidden)]
pub fn open_fd_count() -> io::Result<usize> {
  #[cfg(linux)]
  const FD_DIR: &str = "/proc/self/fd";
  #[cfg(not(linux))]
  const FD_DIR: &str = "/dev/fd";

  Ok(std::fs::read_dir(FD_DIR)?.count())
}
