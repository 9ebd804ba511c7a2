use std::io;

use crate::resolve::ResolveError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The two categories a failed call falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// A required argument was missing or had the wrong type. Detected before
  /// any syscall is issued.
  Argument,
  /// The underlying transport failed: resolution, connect, send or receive.
  Operation,
}

/// Every failure a syncnet call can raise.
///
/// Closing is not represented here: [`Connection::close`](crate::Connection::close)
/// reports failure as a status code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  Argument(#[from] ArgumentError),

  #[error(transparent)]
  Resolve(#[from] ResolveError),

  /// No candidate endpoint accepted a connection.
  #[error("connect failed")]
  Connect {
    /// How many candidates were tried.
    attempts: usize,
    #[source]
    last: Option<io::Error>,
  },

  /// A transmission failed. No byte count is reported for a failed send.
  #[error("send failed")]
  Send(#[source] io::Error),

  #[error("recv failed")]
  Recv(#[source] RecvFailure),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::Argument(_) => ErrorKind::Argument,
      Error::Resolve(_)
      | Error::Connect { .. }
      | Error::Send(_)
      | Error::Recv(_) => ErrorKind::Operation,
    }
  }
}

/// Why a receive produced no bytes.
///
/// Both causes surface as the same [`Error::Recv`]; this only lets a caller
/// that cares tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum RecvFailure {
  #[error("connection closed by peer")]
  PeerClosed,
  #[error(transparent)]
  Io(#[from] io::Error),
}

/// Missing or mistyped arguments on the dynamic call surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
  #[error("port is not specified")]
  PortMissing,
  #[error("port is not a number")]
  PortNotNumber,
  #[error("port is out of range")]
  PortOutOfRange,
  #[error("host is not a string")]
  HostNotString,
  #[error("host contains NUL byte")]
  HostContainsNul,
  #[error("socket is not specified")]
  SocketMissing,
  #[error("socket is not a number")]
  SocketNotNumber,
  #[error("socket and data are not specified")]
  SocketAndDataMissing,
  #[error("data is not specified")]
  DataMissing,
  #[error("data is not a string")]
  DataNotString,
  #[error("{0} is not a function")]
  NotAFunction(String),
}
