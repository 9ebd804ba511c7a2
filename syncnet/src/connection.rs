use std::{
  fmt, io,
  mem::ManuallyDrop,
  net::SocketAddr,
  os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, RawFd},
  time::Duration,
};

use crate::{sys, transport::Transport};

/// An open, connected stream socket with exactly one owner.
///
/// Obtained from [`connect`](crate::connect) or
/// [`Client::connect`](crate::Client::connect). Sending and receiving borrow
/// it; [`close`](Connection::close) consumes it, so a connection can neither
/// be closed twice nor used after closing.
///
/// Dropping a connection without calling `close` still closes the
/// descriptor, it only discards the status.
pub struct Connection {
  fd: RawFd,
}

impl Connection {
  /// Closes the connection and returns the `close(2)` status: `0` on
  /// success, `-1` on failure.
  ///
  /// This is the only call whose failure is a value rather than an
  /// [`Error`](crate::Error); whether to retry or ignore it is up to the
  /// caller.
  pub fn close(self) -> i32 {
    let fd = self.into_raw_fd();
    let status = sys::close(fd);

    if status != 0 {
      tracing::debug!(fd, error = %io::Error::last_os_error(), "close failed");
    }

    status
  }

  /// Address of the connected peer.
  pub fn peer_addr(&self) -> io::Result<SocketAddr> {
    sys::peer_addr(self.fd)
  }

  pub(crate) fn set_timeouts(
    &self,
    read: Option<Duration>,
    write: Option<Duration>,
  ) -> io::Result<()> {
    if read.is_some() {
      sys::set_timeout(self.fd, libc::SO_RCVTIMEO, read)?;
    }
    if write.is_some() {
      sys::set_timeout(self.fd, libc::SO_SNDTIMEO, write)?;
    }
    Ok(())
  }
}

impl Drop for Connection {
  fn drop(&mut self) {
    sys::close(self.fd);
  }
}

impl fmt::Debug for Connection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Connection").field("fd", &self.fd).finish()
  }
}

impl AsRawFd for Connection {
  fn as_raw_fd(&self) -> RawFd {
    self.fd
  }
}

impl AsFd for Connection {
  fn as_fd(&self) -> BorrowedFd<'_> {
    // SAFETY: `fd` is open for as long as `self` lives.
    unsafe { BorrowedFd::borrow_raw(self.fd) }
  }
}

impl IntoRawFd for Connection {
  fn into_raw_fd(self) -> RawFd {
    ManuallyDrop::new(self).fd
  }
}

impl FromRawFd for Connection {
  /// # Safety
  ///
  /// `fd` must be an open, connected stream socket that nothing else will
  /// close.
  unsafe fn from_raw_fd(fd: RawFd) -> Self {
    Self { fd }
  }
}

impl Transport for &Connection {
  fn transmit(&mut self, chunk: &[u8]) -> io::Result<usize> {
    sys::send(self.fd, chunk)
  }

  fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    sys::recv(self.fd, buf)
  }
}

impl Transport for Connection {
  fn transmit(&mut self, chunk: &[u8]) -> io::Result<usize> {
    (&*self).transmit(chunk)
  }

  fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    (&*self).receive(buf)
  }
}
