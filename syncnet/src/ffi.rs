//! # `syncnet` C API
//!
//! Connections cross the boundary as `intptr_t` descriptors. Every function
//! blocks until its syscall returns.
//!
//! Failures are negative return values:
//!
//! | Code | Meaning |
//! |------|---------|
//! | `SYNCNET_EARGUMENT` | null or malformed argument |
//! | `SYNCNET_ERESOLVE` | host could not be resolved |
//! | `SYNCNET_ECONNECT` | no resolved address accepted the connection |
//! | `SYNCNET_ESEND` | a transmission failed |
//! | `SYNCNET_ERECV` | nothing was received (peer closed or I/O error) |
//!
//! `syncnet_close` is the exception: it returns the `close(2)` status.
//!
//! ## Example
//!
//! ```c
//! intptr_t sock = syncnet_connect(9999, "127.0.0.1");
//! if (sock < 0) return 1;
//!
//! syncnet_write(sock, (const uint8_t *)"ping", 4);
//!
//! char buf[4096];
//! ssize_t n = syncnet_read(sock, (uint8_t *)buf, sizeof(buf));
//! if (n > 0) printf("%s\n", buf);   // NUL-terminated
//!
//! syncnet_close(sock);
//! ```
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::{
  ffi::{CStr, c_char},
  mem::ManuallyDrop,
  os::fd::{FromRawFd, IntoRawFd, RawFd},
  slice,
};

use crate::{
  BufferSize, Connection, Error, receiver::recv_once, sender::send_chunked,
};

pub const SYNCNET_EARGUMENT: libc::intptr_t = -1;
pub const SYNCNET_ERESOLVE: libc::intptr_t = -2;
pub const SYNCNET_ECONNECT: libc::intptr_t = -3;
pub const SYNCNET_ESEND: libc::intptr_t = -4;
pub const SYNCNET_ERECV: libc::intptr_t = -5;

fn error_code(err: &Error) -> libc::intptr_t {
  match err {
    Error::Argument(_) => SYNCNET_EARGUMENT,
    Error::Resolve(_) => SYNCNET_ERESOLVE,
    Error::Connect { .. } => SYNCNET_ECONNECT,
    Error::Send(_) => SYNCNET_ESEND,
    Error::Recv(_) => SYNCNET_ERECV,
  }
}

/// Borrows a caller-owned descriptor without taking over closing it.
///
/// # Safety
/// `fd` must stay open for the lifetime of the returned value.
unsafe fn borrow(fd: libc::intptr_t) -> ManuallyDrop<Connection> {
  ManuallyDrop::new(unsafe { Connection::from_raw_fd(fd as RawFd) })
}

/// Connects to `host:port`, or `localhost:port` when `host` is null.
///
/// Returns the connected descriptor, or a negative `SYNCNET_E*` code.
///
/// # Safety
/// `host` must be null or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn syncnet_connect(
  port: u16,
  host: *const c_char,
) -> libc::intptr_t {
  let host = if host.is_null() {
    None
  } else {
    match unsafe { CStr::from_ptr(host) }.to_str() {
      Ok(host) => Some(host),
      Err(_) => return SYNCNET_EARGUMENT,
    }
  };

  match crate::connect(port, host) {
    Ok(conn) => conn.into_raw_fd() as libc::intptr_t,
    Err(err) => error_code(&err),
  }
}

/// Sends `len` bytes from `data` in 4095-byte chunks.
///
/// Returns the number of bytes confirmed sent, which is less than `len`
/// after a short write, or a negative `SYNCNET_E*` code.
///
/// # Safety
/// `fd` must be an open socket; `data` must point to `len` readable bytes
/// (or be null when `len` is 0).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn syncnet_write(
  fd: libc::intptr_t,
  data: *const u8,
  len: usize,
) -> libc::ssize_t {
  let payload = match (data.is_null(), len) {
    (_, 0) => &[][..],
    (true, _) => return SYNCNET_EARGUMENT as libc::ssize_t,
    (false, len) => unsafe { slice::from_raw_parts(data, len) },
  };

  let mut conn = unsafe { borrow(fd) };
  match send_chunked(&mut *conn, payload, BufferSize::DEFAULT) {
    Ok(sent) => sent as libc::ssize_t,
    Err(err) => error_code(&err) as libc::ssize_t,
  }
}

/// Receives once into `buf`, reading at most `cap - 1` bytes and writing a
/// terminating NUL after them.
///
/// Returns the number of bytes received (never 0), or a negative
/// `SYNCNET_E*` code.
///
/// # Safety
/// `fd` must be an open socket; `buf` must point to `cap` writable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn syncnet_read(
  fd: libc::intptr_t,
  buf: *mut u8,
  cap: usize,
) -> libc::ssize_t {
  let Some(size) = BufferSize::new(cap) else {
    return SYNCNET_EARGUMENT as libc::ssize_t;
  };
  if buf.is_null() {
    return SYNCNET_EARGUMENT as libc::ssize_t;
  }

  let mut conn = unsafe { borrow(fd) };
  match recv_once(&mut *conn, size) {
    Ok(received) => {
      // SAFETY: `received.len() <= cap - 1`, so the copy plus terminator
      // fits in the caller's `cap` bytes.
      unsafe {
        let out = slice::from_raw_parts_mut(buf, cap);
        out[..received.len()].copy_from_slice(&received);
        out[received.len()] = 0;
      }
      received.len() as libc::ssize_t
    }
    Err(err) => error_code(&err) as libc::ssize_t,
  }
}

/// Closes `fd` and returns the `close(2)` status: `0` or `-1`.
///
/// # Safety
/// `fd` must be a descriptor obtained from `syncnet_connect` that has not
/// been closed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn syncnet_close(fd: libc::intptr_t) -> libc::c_int {
  unsafe { Connection::from_raw_fd(fd as RawFd) }.close()
}
