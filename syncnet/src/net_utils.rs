use std::{
  io, mem,
  net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6},
  ptr,
};

/// Reads an inet address out of a `sockaddr_storage` filled in by the kernel.
pub(crate) fn libc_socketaddr_into_std(
  storage: &libc::sockaddr_storage,
) -> io::Result<SocketAddr> {
  let family = storage.ss_family as libc::c_int;
  let storage: *const libc::sockaddr_storage = storage;

  // SAFETY (both arms): `ss_family` tells us which struct the storage
  // holds, and sockaddr_storage is large and aligned enough for either.
  match family {
    libc::AF_INET => {
      let sin = unsafe { &*storage.cast::<libc::sockaddr_in>() };
      let ip = Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr));

      Ok(SocketAddr::V4(SocketAddrV4::new(ip, u16::from_be(sin.sin_port))))
    }
    libc::AF_INET6 => {
      let sin6 = unsafe { &*storage.cast::<libc::sockaddr_in6>() };

      Ok(SocketAddr::V6(SocketAddrV6::new(
        Ipv6Addr::from(sin6.sin6_addr.s6_addr),
        u16::from_be(sin6.sin6_port),
        sin6.sin6_flowinfo,
        sin6.sin6_scope_id,
      )))
    }
    _ => Err(io::Error::from_raw_os_error(libc::EAFNOSUPPORT)),
  }
}

/// Converts a resolver-owned `sockaddr` of `len` bytes.
///
/// # Safety
///
/// `addr` must be null or point to `len` readable bytes of an initialized
/// socket address.
pub(crate) unsafe fn raw_sockaddr_into_std(
  addr: *const libc::sockaddr,
  len: libc::socklen_t,
) -> io::Result<SocketAddr> {
  if addr.is_null() {
    return Err(io::Error::from_raw_os_error(libc::EINVAL));
  }

  // SAFETY: all-zero is a valid sockaddr_storage.
  let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
  let len = (len as usize).min(mem::size_of::<libc::sockaddr_storage>());

  // SAFETY: the caller guarantees `len` readable bytes behind `addr`, and
  // the copy is clamped to the size of the destination.
  unsafe {
    ptr::copy_nonoverlapping(
      addr.cast::<u8>(),
      (&mut storage as *mut libc::sockaddr_storage).cast::<u8>(),
      len,
    );
  }

  libc_socketaddr_into_std(&storage)
}

/// Lays `addr` out as a `sockaddr_storage` plus the length `connect(2)`
/// expects for its family.
pub(crate) fn std_socketaddr_into_libc(
  addr: &SocketAddr,
) -> (libc::sockaddr_storage, libc::socklen_t) {
  // SAFETY: all-zero is a valid sockaddr_storage.
  let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
  let dst: *mut libc::sockaddr_storage = &mut storage;

  let len = match addr {
    SocketAddr::V4(v4) => {
      // SAFETY: sockaddr_in fits in sockaddr_storage by design.
      unsafe { dst.cast::<libc::sockaddr_in>().write(into_addr(v4)) };
      mem::size_of::<libc::sockaddr_in>()
    }
    SocketAddr::V6(v6) => {
      // SAFETY: sockaddr_in6 fits in sockaddr_storage by design.
      unsafe { dst.cast::<libc::sockaddr_in6>().write(into_addr6(v6)) };
      mem::size_of::<libc::sockaddr_in6>()
    }
  };

  (storage, len as libc::socklen_t)
}

fn into_addr(addr: &SocketAddrV4) -> libc::sockaddr_in {
  // SAFETY: sockaddr_in only has integer fields; zero is valid for all.
  let mut sin: libc::sockaddr_in = unsafe { mem::zeroed() };

  #[cfg(sockaddr_len)]
  {
    sin.sin_len = mem::size_of::<libc::sockaddr_in>() as u8;
  }
  sin.sin_family = libc::AF_INET as libc::sa_family_t;
  sin.sin_port = addr.port().to_be();
  sin.sin_addr = libc::in_addr { s_addr: u32::from(*addr.ip()).to_be() };

  sin
}

fn into_addr6(addr: &SocketAddrV6) -> libc::sockaddr_in6 {
  // SAFETY: sockaddr_in6 only has integer and array fields.
  let mut sin6: libc::sockaddr_in6 = unsafe { mem::zeroed() };

  #[cfg(sockaddr_len)]
  {
    sin6.sin6_len = mem::size_of::<libc::sockaddr_in6>() as u8;
  }
  sin6.sin6_family = libc::AF_INET6 as libc::sa_family_t;
  sin6.sin6_port = addr.port().to_be();
  sin6.sin6_addr = libc::in6_addr { s6_addr: addr.ip().octets() };
  sin6.sin6_flowinfo = addr.flowinfo();
  sin6.sin6_scope_id = addr.scope_id();

  sin6
}
