//! A dynamically typed call surface for embedding in a scripting host.
//!
//! Script engines hand native functions a list of loosely typed arguments
//! and expect loosely typed results back. [`Bindings`] exposes the four
//! operations that way, under the export names `connect`, `read`, `write`
//! and `close`, with connections passed around as plain numbers.
//!
//! Arguments are checked before anything touches the network: presence
//! first, then type. Both kinds of mistake come back as
//! [`Error::Argument`](crate::Error::Argument).
//!
//! ```no_run
//! use syncnet::binding::{Bindings, Value};
//!
//! let mut net = Bindings::default();
//!
//! let sock = net.call("connect", &[Value::from(9999), Value::from("127.0.0.1")])?;
//! let sent = net.call("write", &[sock.clone(), Value::from("ping")])?;
//! assert_eq!(sent, Value::Number(4.0));
//!
//! let reply = net.call("read", &[sock.clone()])?;
//! let status = net.call("close", &[sock])?;
//! assert_eq!(status, Value::Number(0.0));
//! # let _ = reply;
//! # Ok::<(), syncnet::Error>(())
//! ```

use std::{
  collections::HashMap,
  io,
  os::fd::{AsRawFd, RawFd},
};

use crate::{ArgumentError, Client, Connection, Error, RecvFailure, Result};

/// A loosely typed argument or result.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
  #[default]
  Undefined,
  Number(f64),
  String(String),
}

impl Value {
  pub fn as_number(&self) -> Option<f64> {
    match self {
      Value::Number(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(s),
      _ => None,
    }
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Number(value)
  }
}

impl From<i32> for Value {
  fn from(value: i32) -> Self {
    Value::Number(value.into())
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::String(value.to_owned())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::String(value)
  }
}

/// The export table.
///
/// Connections opened through `connect` are held here, keyed by the number
/// handed to the script, until `close` is called with that number. Handles
/// that were never issued (or were already closed) behave like a bad
/// descriptor: `read` and `write` fail, `close` returns `-1`.
#[derive(Debug, Default)]
pub struct Bindings {
  client: Client,
  open: HashMap<RawFd, Connection>,
}

impl Bindings {
  pub const EXPORTS: [&'static str; 4] = ["connect", "read", "write", "close"];

  pub fn new(client: Client) -> Self {
    Self { client, open: HashMap::new() }
  }

  /// Invokes the export called `name`.
  pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value> {
    match name {
      "connect" => self.connect(args),
      "read" => self.read(args),
      "write" => self.write(args),
      "close" => self.close(args),
      other => Err(ArgumentError::NotAFunction(other.to_owned()).into()),
    }
  }

  /// `connect(port, host?)`: returns the new connection's handle.
  pub fn connect(&mut self, args: &[Value]) -> Result<Value> {
    let port = match args.first() {
      None => return Err(ArgumentError::PortMissing.into()),
      Some(Value::Number(port)) => port_from(*port)?,
      Some(_) => return Err(ArgumentError::PortNotNumber.into()),
    };

    let host = match args.get(1) {
      None => None,
      Some(Value::String(host)) => Some(host.as_str()),
      Some(_) => return Err(ArgumentError::HostNotString.into()),
    };

    let conn = self.client.connect(port, host)?;
    let handle = conn.as_raw_fd();
    self.open.insert(handle, conn);

    Ok(Value::from(handle))
  }

  /// `read(socket)`: one receive, returned as a string.
  pub fn read(&mut self, args: &[Value]) -> Result<Value> {
    let handle = match args.first() {
      None => return Err(ArgumentError::SocketMissing.into()),
      Some(value) => handle_from(value)?,
    };

    let Some(conn) = self.open.get(&handle) else {
      return Err(Error::Recv(RecvFailure::Io(bad_handle())));
    };

    self.client.recv(conn).map(Value::String)
  }

  /// `write(socket, data)`: returns the number of bytes confirmed sent.
  pub fn write(&mut self, args: &[Value]) -> Result<Value> {
    let (handle, data) = match args {
      [] => return Err(ArgumentError::SocketAndDataMissing.into()),
      [_] => return Err(ArgumentError::DataMissing.into()),
      [handle, data, ..] => (handle, data),
    };

    let handle = handle_from(handle)?;
    let Value::String(data) = data else {
      return Err(ArgumentError::DataNotString.into());
    };

    let Some(conn) = self.open.get(&handle) else {
      return Err(Error::Send(bad_handle()));
    };

    let sent = self.client.send(conn, data)?;
    Ok(Value::Number(sent as f64))
  }

  /// `close(socket)`: returns the close status, `0` on success.
  pub fn close(&mut self, args: &[Value]) -> Result<Value> {
    let handle = match args.first() {
      None => return Err(ArgumentError::SocketMissing.into()),
      Some(value) => handle_from(value)?,
    };

    let status = match self.open.remove(&handle) {
      Some(conn) => conn.close(),
      None => -1,
    };

    Ok(Value::from(status))
  }
}

fn port_from(port: f64) -> Result<u16, ArgumentError> {
  if port.is_finite() && (0.0..=f64::from(u16::MAX)).contains(&port) {
    Ok(port as u16)
  } else {
    Err(ArgumentError::PortOutOfRange)
  }
}

fn handle_from(value: &Value) -> Result<RawFd, ArgumentError> {
  match value {
    Value::Number(n) if n.is_finite() => Ok(*n as RawFd),
    Value::Number(_) => Ok(-1),
    _ => Err(ArgumentError::SocketNotNumber),
  }
}

fn bad_handle() -> io::Error {
  io::Error::from_raw_os_error(libc::EBADF)
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::ErrorKind;

  fn argument_error(result: Result<Value>) -> ArgumentError {
    match result {
      Err(Error::Argument(err)) => err,
      other => panic!("expected an argument error, got {other:?}"),
    }
  }

  #[test]
  fn connect_validation_order() {
    let mut net = Bindings::default();

    assert_eq!(argument_error(net.call("connect", &[])), ArgumentError::PortMissing);
    assert_eq!(
      argument_error(net.call("connect", &["80".into()])),
      ArgumentError::PortNotNumber
    );
    assert_eq!(
      argument_error(net.call("connect", &[80.into(), 1.into()])),
      ArgumentError::HostNotString
    );
    assert_eq!(
      argument_error(net.call("connect", &[80.into(), Value::Undefined])),
      ArgumentError::HostNotString
    );
    assert_eq!(
      argument_error(net.call("connect", &[70000.into()])),
      ArgumentError::PortOutOfRange
    );
    assert_eq!(
      argument_error(net.call("connect", &[f64::NAN.into()])),
      ArgumentError::PortOutOfRange
    );
  }

  #[test]
  fn read_and_close_validation() {
    let mut net = Bindings::default();

    for name in ["read", "close"] {
      assert_eq!(argument_error(net.call(name, &[])), ArgumentError::SocketMissing);
      assert_eq!(
        argument_error(net.call(name, &["3".into()])),
        ArgumentError::SocketNotNumber
      );
    }
  }

  #[test]
  fn write_checks_presence_before_type() {
    let mut net = Bindings::default();

    assert_eq!(
      argument_error(net.call("write", &[])),
      ArgumentError::SocketAndDataMissing
    );
    // Presence wins even when the one argument given is mistyped.
    assert_eq!(
      argument_error(net.call("write", &["x".into()])),
      ArgumentError::DataMissing
    );
    assert_eq!(
      argument_error(net.call("write", &["x".into(), 1.into()])),
      ArgumentError::SocketNotNumber
    );
    assert_eq!(
      argument_error(net.call("write", &[3.into(), 1.into()])),
      ArgumentError::DataNotString
    );
  }

  #[test]
  fn messages() {
    assert_eq!(ArgumentError::PortMissing.to_string(), "port is not specified");
    assert_eq!(
      ArgumentError::SocketAndDataMissing.to_string(),
      "socket and data are not specified"
    );
    assert_eq!(
      ArgumentError::NotAFunction("listen".into()).to_string(),
      "listen is not a function"
    );
  }

  #[test]
  fn unknown_handles_behave_like_bad_descriptors() {
    let mut net = Bindings::default();

    let err = net.call("read", &[12345.into()]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Operation);
    assert_eq!(err.to_string(), "recv failed");

    let err = net.call("write", &[12345.into(), "x".into()]).unwrap_err();
    assert_eq!(err.to_string(), "send failed");

    assert_eq!(net.call("close", &[12345.into()]).unwrap(), Value::Number(-1.0));
  }

  #[test]
  fn unknown_export() {
    let mut net = Bindings::default();
    let err = net.call("listen", &[]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Argument);
    assert!(!Bindings::EXPORTS.contains(&"listen"));
  }
}
