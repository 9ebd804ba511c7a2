use crate::{
  ArgumentError, Config, Connection, Result, connector::connect_first,
  receiver::recv_once, resolve::resolve, sender::send_chunked,
};

/// The four blocking operations, bound to one [`Config`].
///
/// A client holds no connection state of its own; every [`Connection`] it
/// hands out belongs to the caller.
#[derive(Debug, Clone, Default)]
pub struct Client {
  config: Config,
}

impl Client {
  pub const fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Resolves `host` (or the configured default host) and connects to the
  /// first candidate that accepts.
  pub fn connect(&self, port: u16, host: Option<&str>) -> Result<Connection> {
    let host = host.unwrap_or(&*self.config.default_host);
    if host.contains('\0') {
      return Err(ArgumentError::HostContainsNul.into());
    }

    let candidates = resolve(host, port)?;
    connect_first(candidates, &self.config)
  }

  /// Sends all of `payload` in buffer-sized chunks and returns the number of
  /// bytes confirmed sent. See [`send_chunked`](crate::send_chunked).
  pub fn send(
    &self,
    conn: &Connection,
    payload: impl AsRef<[u8]>,
  ) -> Result<usize> {
    let mut transport = conn;
    send_chunked(&mut transport, payload.as_ref(), self.config.buffer_size)
  }

  /// Receives once, returning the raw bytes.
  pub fn recv_bytes(&self, conn: &Connection) -> Result<Vec<u8>> {
    let mut transport = conn;
    recv_once(&mut transport, self.config.buffer_size)
  }

  /// Receives once, returning the bytes as text. Invalid UTF-8 is replaced
  /// rather than rejected.
  pub fn recv(&self, conn: &Connection) -> Result<String> {
    let bytes = self.recv_bytes(conn)?;

    Ok(match String::from_utf8(bytes) {
      Ok(text) => text,
      Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
  }

  /// Closes `conn`; see [`Connection::close`].
  pub fn close(&self, conn: Connection) -> i32 {
    conn.close()
  }
}
