//! Thin wrappers over the socket syscalls issued by this crate.
//!
//! Every function here maps to exactly one blocking syscall (plus the
//! descriptor setup `socket` needs). None of them retry, and none of them
//! touch any state beyond the descriptor they are given.

use std::{io, mem, net::SocketAddr, os::fd::RawFd, time::Duration};

use crate::net_utils;

#[cfg(linux)]
const SEND_FLAGS: libc::c_int = libc::MSG_NOSIGNAL;
#[cfg(not(linux))]
const SEND_FLAGS: libc::c_int = 0;

/// Creates a blocking socket with close-on-exec set and SIGPIPE disabled.
pub(crate) fn socket(
  family: libc::c_int,
  ty: libc::c_int,
  protocol: libc::c_int,
) -> io::Result<RawFd> {
  #[cfg(linux)]
  let ty = ty | libc::SOCK_CLOEXEC;

  let fd = syscall!(socket(family, ty, protocol))?;

  if let Err(err) = setup(fd) {
    close(fd);
    return Err(err);
  }

  Ok(fd)
}

fn setup(fd: RawFd) -> io::Result<()> {
  #[cfg(not(linux))]
  syscall!(fcntl(fd, libc::F_SETFD, libc::FD_CLOEXEC))?;

  disable_sigpipe(fd)
}

/// Disables SIGPIPE for writes to a socket whose peer has gone away.
///
/// Without this a send on a reset connection kills the process instead of
/// returning `EPIPE`. Linux has no per-socket option, so there every send
/// passes `MSG_NOSIGNAL` instead and this is a no-op.
fn disable_sigpipe(#[allow(unused)] fd: RawFd) -> io::Result<()> {
  #[cfg(nosigpipe)]
  {
    let opt: libc::c_int = 1;
    syscall!(setsockopt(
      fd,
      libc::SOL_SOCKET,
      libc::SO_NOSIGPIPE,
      &opt as *const libc::c_int as *const libc::c_void,
      mem::size_of::<libc::c_int>() as libc::socklen_t
    ))?;
  }
  Ok(())
}

pub(crate) fn connect(fd: RawFd, addr: &SocketAddr) -> io::Result<()> {
  let (storage, len) = net_utils::std_socketaddr_into_libc(addr);
  syscall!(connect(
    fd,
    (&storage as *const libc::sockaddr_storage).cast::<libc::sockaddr>(),
    len
  ))
  .map(drop)
}

pub(crate) fn send(fd: RawFd, buf: &[u8]) -> io::Result<usize> {
  syscall!(send(fd, buf.as_ptr().cast::<libc::c_void>(), buf.len(), SEND_FLAGS))
    .map(|sent| sent as usize)
}

pub(crate) fn recv(fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
  syscall!(recv(fd, buf.as_mut_ptr().cast::<libc::c_void>(), buf.len(), 0))
    .map(|received| received as usize)
}

/// Returns the raw `close(2)` status: `0` or `-1` with `errno` set.
pub(crate) fn close(fd: RawFd) -> libc::c_int {
  // SAFETY: closing an integer has no memory-safety requirements; callers
  // own `fd`.
  unsafe { libc::close(fd) }
}

/// Sets `SO_RCVTIMEO` or `SO_SNDTIMEO`. `None` restores blocking forever.
pub(crate) fn set_timeout(
  fd: RawFd,
  option: libc::c_int,
  timeout: Option<Duration>,
) -> io::Result<()> {
  let tv = match timeout {
    Some(dur) => {
      let mut tv = libc::timeval {
        tv_sec: dur.as_secs().min(libc::time_t::MAX as u64) as libc::time_t,
        tv_usec: dur.subsec_micros() as libc::suseconds_t,
      };
      // A zeroed timeval means "no timeout".
      if tv.tv_sec == 0 && tv.tv_usec == 0 {
        tv.tv_usec = 1;
      }
      tv
    }
    None => libc::timeval { tv_sec: 0, tv_usec: 0 },
  };

  syscall!(setsockopt(
    fd,
    libc::SOL_SOCKET,
    option,
    &tv as *const libc::timeval as *const libc::c_void,
    mem::size_of::<libc::timeval>() as libc::socklen_t
  ))
  .map(drop)
}

pub(crate) fn peer_addr(fd: RawFd) -> io::Result<SocketAddr> {
  // SAFETY: all-zero is a valid sockaddr_storage.
  let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
  let mut len = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;

  syscall!(getpeername(
    fd,
    (&mut storage as *mut libc::sockaddr_storage).cast::<libc::sockaddr>(),
    &mut len
  ))?;

  net_utils::libc_socketaddr_into_std(&storage)
}
