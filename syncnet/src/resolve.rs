//! Resolution of a host and port into connect candidates.
//!
//! [`resolve`] asks the system resolver (`getaddrinfo(3)`) for stream
//! endpoints of any address family and hands them back in the order the
//! resolver produced them. That order is the order
//! [`connect_first`](crate::connect_first) tries them in.

use std::{
  ffi::{CStr, CString},
  fmt, io, iter, mem,
  net::SocketAddr,
  ptr,
};

use crate::net_utils;

/// One resolved (family, socket type, protocol, address) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
  family: libc::c_int,
  socket_type: libc::c_int,
  protocol: libc::c_int,
  addr: SocketAddr,
}

impl Endpoint {
  /// A TCP endpoint for `addr`, with the family implied by the address.
  pub fn new(addr: SocketAddr) -> Self {
    let family = match addr {
      SocketAddr::V4(_) => libc::AF_INET,
      SocketAddr::V6(_) => libc::AF_INET6,
    };

    Self::from_parts(family, libc::SOCK_STREAM, libc::IPPROTO_TCP, addr)
  }

  pub const fn from_parts(
    family: libc::c_int,
    socket_type: libc::c_int,
    protocol: libc::c_int,
    addr: SocketAddr,
  ) -> Self {
    Self { family, socket_type, protocol, addr }
  }

  pub const fn family(&self) -> libc::c_int {
    self.family
  }

  pub const fn socket_type(&self) -> libc::c_int {
    self.socket_type
  }

  pub const fn protocol(&self) -> libc::c_int {
    self.protocol
  }

  pub const fn addr(&self) -> SocketAddr {
    self.addr
  }
}

impl fmt::Display for Endpoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.addr.fmt(f)
  }
}

/// The resolver could not produce any endpoint.
///
/// Displays as `getaddrinfo: <resolver diagnostic>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("getaddrinfo: {message}")]
pub struct ResolveError {
  code: libc::c_int,
  message: String,
}

impl ResolveError {
  /// Must be called right after the failing resolver call, `EAI_SYSTEM`
  /// reads its cause from `errno`.
  fn from_code(code: libc::c_int) -> Self {
    let message = if code == libc::EAI_SYSTEM {
      io::Error::last_os_error().to_string()
    } else {
      // SAFETY: gai_strerror returns a static, NUL-terminated string.
      unsafe { CStr::from_ptr(libc::gai_strerror(code)) }
        .to_string_lossy()
        .into_owned()
    };

    Self { code, message }
  }

  /// The `EAI_*` code reported by the resolver.
  pub fn code(&self) -> i32 {
    self.code
  }

  /// The resolver's own description of the failure.
  pub fn message(&self) -> &str {
    &self.message
  }
}

/// Owns the list returned by `getaddrinfo`.
struct AddrInfoList(*mut libc::addrinfo);

impl AddrInfoList {
  fn iter(&self) -> impl Iterator<Item = &libc::addrinfo> {
    // SAFETY: every node stays valid until `freeaddrinfo` runs in `Drop`,
    // which cannot happen while `self` is borrowed.
    iter::successors(unsafe { self.0.as_ref() }, |ai| unsafe {
      ai.ai_next.as_ref()
    })
  }
}

impl Drop for AddrInfoList {
  fn drop(&mut self) {
    if !self.0.is_null() {
      // SAFETY: the pointer came from a successful getaddrinfo call and is
      // freed exactly once.
      unsafe { libc::freeaddrinfo(self.0) };
    }
  }
}

/// Resolves `host` and `port` into an ordered, non-empty list of stream
/// endpoints.
///
/// `host` may be a name or a literal IPv4/IPv6 address. No address family is
/// preferred; the resolver decides both which families appear and their
/// order.
///
/// ```no_run
/// let endpoints = syncnet::resolve::resolve("localhost", 8080)?;
/// assert!(endpoints.iter().all(|ep| ep.addr().port() == 8080));
/// # Ok::<(), syncnet::resolve::ResolveError>(())
/// ```
pub fn resolve(host: &str, port: u16) -> Result<Vec<Endpoint>, ResolveError> {
  let Ok(node) = CString::new(host) else {
    return Err(ResolveError::from_code(libc::EAI_NONAME));
  };
  let Ok(service) = CString::new(port.to_string()) else {
    return Err(ResolveError::from_code(libc::EAI_SERVICE));
  };

  // SAFETY: an all-zero addrinfo is the documented "no hints" value.
  let mut hints: libc::addrinfo = unsafe { mem::zeroed() };
  hints.ai_family = libc::AF_UNSPEC;
  hints.ai_socktype = libc::SOCK_STREAM;
  hints.ai_flags = libc::AI_NUMERICSERV;

  let mut list = AddrInfoList(ptr::null_mut());

  // SAFETY: node and service are NUL-terminated, hints is initialized and
  // `list.0` is a valid out pointer.
  let code = unsafe {
    libc::getaddrinfo(node.as_ptr(), service.as_ptr(), &hints, &mut list.0)
  };
  if code != 0 {
    let err = ResolveError::from_code(code);
    tracing::debug!(host, port, error = %err, "resolution failed");
    return Err(err);
  }

  let endpoints: Vec<Endpoint> = list
    .iter()
    .filter_map(|ai| {
      // SAFETY: ai_addr and ai_addrlen describe this node's address.
      let addr =
        unsafe { net_utils::raw_sockaddr_into_std(ai.ai_addr, ai.ai_addrlen) }
          .ok()?;

      Some(Endpoint::from_parts(
        ai.ai_family,
        ai.ai_socktype,
        ai.ai_protocol,
        addr,
      ))
    })
    .collect();

  if endpoints.is_empty() {
    return Err(ResolveError::from_code(libc::EAI_NONAME));
  }

  tracing::debug!(host, port, candidates = endpoints.len(), "resolved");
  Ok(endpoints)
}
